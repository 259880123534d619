//! Navigation targets returned by the flows.
//!
//! The flows never render anything; they tell the caller where to go next.

use std::fmt;

use atelier_core::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Products,
    Product(ProductId),
    Cart,
    Confirm,
    Complete,
    Login,
    AddressRegistration,
    MyPage,
}

impl Route {
    /// URL path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Products => "/products".to_string(),
            Self::Product(id) => format!("/products/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Confirm => "/confirm".to_string(),
            Self::Complete => "/complete".to_string(),
            Self::Login => "/login".to_string(),
            Self::AddressRegistration => "/mypage/addresses/new".to_string(),
            Self::MyPage => "/mypage".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
