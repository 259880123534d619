//! Shared observable state.
//!
//! Stores are passed around by handle; nothing here is global.

pub mod cart;
pub mod user;

pub use cart::{CartError, CartStore};
pub use user::UserStore;
