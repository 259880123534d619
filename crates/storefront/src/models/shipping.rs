//! Delivery address chosen for checkout.

use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, is_filled};
use crate::backend::{Address, AddressUpsert, UserProfile, UserUpdate};

/// Where an order ships to.
///
/// Every field is optional on its own; [`validate`](Self::validate) decides
/// whether the whole is usable. Blank strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSelection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    /// Legacy single-line address; accepted in place of `address_line1`.
    #[serde(default)]
    pub address: Option<String>,
}

impl ShippingSelection {
    /// Check that name, postal code, prefecture, city and a street line are
    /// all present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` naming every missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if !is_filled(self.name.as_deref()) {
            missing.push("name");
        }
        if !is_filled(self.postal_code.as_deref()) {
            missing.push("postalCode");
        }
        if !is_filled(self.prefecture.as_deref()) {
            missing.push("prefecture");
        }
        if !is_filled(self.city.as_deref()) {
            missing.push("city");
        }
        if !is_filled(self.address_line1.as_deref()) && !is_filled(self.address.as_deref()) {
            missing.push("addressLine1");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    #[must_use]
    pub fn from_address(address: &Address) -> Self {
        Self {
            name: Some(address.name.clone()),
            phone_number: address.phone.clone(),
            postal_code: address.postal_code.clone(),
            prefecture: address.prefecture.clone(),
            city: address.city.clone(),
            address_line1: address.address_line1.clone(),
            address_line2: address.address_line2.clone(),
            address: address.address.clone(),
        }
    }

    #[must_use]
    pub fn from_profile(user: &UserProfile) -> Self {
        Self {
            name: Some(user.name.clone()),
            phone_number: user.phone_number.clone(),
            postal_code: user.postal_code.clone(),
            prefecture: user.prefecture.clone(),
            city: user.city.clone(),
            address_line1: user.address_line1.clone(),
            address_line2: user.address_line2.clone(),
            address: user.address.clone(),
        }
    }

    /// Payload for saving this selection as an address book entry.
    #[must_use]
    pub fn to_address_upsert(&self) -> AddressUpsert {
        AddressUpsert {
            name: self.name.clone(),
            furigana: None,
            postal_code: self.postal_code.clone(),
            prefecture: self.prefecture.clone(),
            city: self.city.clone(),
            address_line1: self.address_line1.clone(),
            address_line2: self.address_line2.clone(),
            address: self.address.clone(),
            phone: self.phone_number.clone(),
            email: None,
        }
        .sanitize()
    }

    /// Payload for copying this selection's address onto the profile.
    ///
    /// The profile name is left alone; the recipient may be someone else.
    #[must_use]
    pub fn to_user_update(&self) -> UserUpdate {
        let trimmed = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        UserUpdate {
            phone_number: trimmed(&self.phone_number),
            postal_code: trimmed(&self.postal_code),
            prefecture: trimmed(&self.prefecture),
            city: trimmed(&self.city),
            address_line1: trimmed(&self.address_line1).or_else(|| trimmed(&self.address)),
            address_line2: trimmed(&self.address_line2),
            ..UserUpdate::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn complete() -> ShippingSelection {
        ShippingSelection {
            name: Some("山田 太郎".to_string()),
            phone_number: Some("090-0000-0000".to_string()),
            postal_code: Some("150-0001".to_string()),
            prefecture: Some("東京都".to_string()),
            city: Some("渋谷区".to_string()),
            address_line1: Some("神宮前1-1-1".to_string()),
            address_line2: None,
            address: None,
        }
    }

    #[test]
    fn test_complete_selection_is_valid() {
        assert!(complete().is_valid());
    }

    #[test]
    fn test_legacy_address_substitutes_for_line1() {
        let selection = ShippingSelection {
            address_line1: None,
            address: Some("神宮前1-1-1".to_string()),
            ..complete()
        };
        assert!(selection.is_valid());
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let selection = ShippingSelection {
            city: Some("  ".to_string()),
            address_line1: Some(String::new()),
            ..complete()
        };
        assert_eq!(
            selection.validate().unwrap_err(),
            ValidationError::MissingFields(vec!["city", "addressLine1"])
        );
    }

    #[test]
    fn test_empty_selection_lists_everything() {
        let err = ShippingSelection::default().validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "name",
                "postalCode",
                "prefecture",
                "city",
                "addressLine1"
            ])
        );
    }

    #[test]
    fn test_to_user_update_prefers_line1() {
        let update = ShippingSelection {
            address: Some("old".to_string()),
            ..complete()
        }
        .to_user_update();
        assert_eq!(update.address_line1.as_deref(), Some("神宮前1-1-1"));
        assert_eq!(update.name, None);
    }

    #[test]
    fn test_round_trips_through_session_json() {
        let json = serde_json::to_string(&complete()).unwrap();
        assert!(json.contains("postalCode"));
        let back: ShippingSelection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, complete());
    }
}
