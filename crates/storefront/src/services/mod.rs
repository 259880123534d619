//! Flows built on the stores and the backend client.
//!
//! # Services
//!
//! - `reconcile` - Load the server cart into an empty local cart
//! - `cart_sync` - Cart mutations that reach the server for signed-in users
//! - `pending_cart` - Guest cart carried through login
//! - `products` - Product enrichment with batch-then-fallback lookup
//! - `shipping` - Shipping address resolution and address book upkeep
//! - `checkout` - Order submission
//! - `confirmation` - Completion view guard
//! - `admin` - Admin console operations

pub mod admin;
pub mod cart_sync;
pub mod checkout;
pub mod confirmation;
pub mod pending_cart;
pub mod products;
pub mod reconcile;
pub mod shipping;

pub use admin::{AdminConsole, AdminError, ProductForm, UserForm};
pub use cart_sync::CartSync;
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutState, Submitted};
pub use confirmation::CompletionView;
pub use pending_cart::{PendingCartBridge, RestoredCart};
pub use products::{NO_IMAGE, ProductLookup, ProductMap};
pub use reconcile::{CartReconciler, ReconcileOutcome};
pub use shipping::{ShippingError, ShippingResolution, ShippingService, ShippingSource};
