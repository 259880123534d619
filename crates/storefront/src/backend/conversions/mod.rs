//! Conversions from wire types to the client's models.
//!
//! Every payload that ends up in a store passes through here, so legacy
//! field spellings are handled in exactly one place.

pub mod cart;
pub mod orders;

pub use cart::{normalize_cart_item, normalize_cart_items};
pub use orders::{convert_order, parse_ordered_at};
