//! Order submission.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Completed
//!                      │
//!                      └──err──▶ Failed
//! ```
//!
//! A submit while `Submitting` is refused, so at most one order creation
//! request is ever in flight. `Completed` and `Failed` both accept a new
//! submit.

use chrono::{Duration, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::backend::conversions::convert_order;
use crate::backend::{ApiError, BackendClient, CreateOrderItem};
use crate::models::session::keys;
use crate::models::{CartItem, CompletedOrder, Order};
use crate::routes::Route;
use crate::services::shipping::ShippingResolution;
use crate::session::Session;
use crate::stores::CartStore;

/// How long the completion marker stays valid if never consumed.
const COMPLETION_MARKER_TTL_SECS: i64 = 600;

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    /// No usable shipping address; send the user to register one.
    #[error("A shipping address must be registered before ordering")]
    NeedsRegistration,

    #[error("The cart is empty")]
    EmptyCart,

    /// Another submit is still in flight.
    #[error("An order is already being submitted")]
    AlreadySubmitting,

    #[error("Order submission failed: {0}")]
    Submission(#[from] ApiError),
}

impl CheckoutError {
    /// Where the user should be sent, if anywhere.
    #[must_use]
    pub const fn redirect(&self) -> Option<Route> {
        match self {
            Self::NeedsRegistration => Some(Route::AddressRegistration),
            Self::EmptyCart => Some(Route::Cart),
            Self::AlreadySubmitting | Self::Submission(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Completed(CompletedOrder),
    /// Retryable; carries a message for the user.
    Failed(String),
}

/// A placed order and where to go next.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub order: Order,
    pub next: Route,
}

/// Drives checkout for one cart.
#[derive(Clone)]
pub struct CheckoutFlow {
    client: BackendClient,
    cart: CartStore,
    session: Session,
    state: watch::Sender<CheckoutState>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(client: BackendClient, cart: CartStore, session: Session) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            client,
            cart,
            session,
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    /// Place an order for `items`.
    ///
    /// Only product IDs and quantities are sent. On success the local cart
    /// is emptied, the completion marker is stored in the session, and the
    /// server cart is cleared in the background (a failure there is only
    /// logged). On failure the cart is left untouched.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::NeedsRegistration` if no shipping address resolves
    /// - `CheckoutError::EmptyCart` if `items` is empty
    /// - `CheckoutError::AlreadySubmitting` if a submit is in flight
    /// - `CheckoutError::Submission` if the backend refuses the order
    #[instrument(skip_all, fields(lines = items.len()))]
    pub async fn submit(
        &self,
        shipping: &ShippingResolution,
        items: &[CartItem],
    ) -> Result<Submitted, CheckoutError> {
        if shipping.needs_registration || shipping.selected.is_none() {
            return Err(CheckoutError::NeedsRegistration);
        }
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let entered = self.state.send_if_modified(|state| {
            if *state == CheckoutState::Submitting {
                false
            } else {
                *state = CheckoutState::Submitting;
                true
            }
        });
        if !entered {
            return Err(CheckoutError::AlreadySubmitting);
        }

        let lines: Vec<CreateOrderItem> = items
            .iter()
            .map(|item| CreateOrderItem {
                product_id: item.product_id,
                quantity: item.quantity(),
            })
            .collect();

        let order = match self.client.checkout(&lines).await {
            Ok(raw) => convert_order(raw),
            Err(e) => {
                warn!(error = %e, "order submission failed");
                self.state
                    .send_replace(CheckoutState::Failed(submission_message(&e)));
                return Err(CheckoutError::Submission(e));
            }
        };

        info!(order_id = %order.order_id, "order placed");

        self.cart.clear();
        let marker = CompletedOrder {
            order_id: order.order_id,
            order_number: order.order_number.clone(),
            ordered_at: order.ordered_at_label(),
            expires_at: Utc::now() + Duration::seconds(COMPLETION_MARKER_TTL_SECS),
        };
        self.session.insert(keys::CHECKOUT_COMPLETED, &marker);
        self.state.send_replace(CheckoutState::Completed(marker));

        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.clear_cart().await {
                warn!(error = %e, "failed to clear server cart after checkout");
            }
        });

        Ok(Submitted {
            order,
            next: Route::Complete,
        })
    }
}

fn submission_message(err: &ApiError) -> String {
    if err.is_retryable() {
        "注文を確定できませんでした。時間をおいて再度お試しください。".to_string()
    } else {
        "注文を確定できませんでした。カートの内容をご確認のうえ、再度お試しください。".to_string()
    }
}
