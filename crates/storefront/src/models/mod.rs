//! Client-side domain models.
//!
//! Wire shapes live in [`crate::backend::types`]; these are what the stores
//! and flows hold after normalization.

pub mod cart;
pub mod order;
pub mod session;
pub mod shipping;
pub mod validation;

pub use cart::{CartItem, NewCartItem, PER_PERSON_LIMIT, QuantityLimits, SAFETY_MAX};
pub use order::{Order, OrderLine};
pub use session::{CompletedOrder, PendingCart};
pub use shipping::ShippingSelection;
pub use validation::ValidationError;
