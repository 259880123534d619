//! Loading the server cart into an empty local cart.

use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::backend::{ApiError, BackendClient};
use crate::scope::ViewScope;
use crate::stores::{CartStore, UserStore};

/// What a reconciliation run did.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// No user; the local cart is left as is.
    Guest,
    /// The local cart already had lines; nothing was fetched or changed.
    AlreadyLoaded,
    /// The server cart was loaded.
    Loaded { lines: usize },
    /// The view went away before the fetch finished.
    Discarded,
    /// The fetch failed; the cart stays empty.
    Failed(ApiError),
}

/// Pulls the server cart into the store when the store is empty.
#[derive(Clone)]
pub struct CartReconciler {
    client: BackendClient,
    cart: CartStore,
    user: UserStore,
}

impl CartReconciler {
    #[must_use]
    pub const fn new(client: BackendClient, cart: CartStore, user: UserStore) -> Self {
        Self { client, cart, user }
    }

    /// One reconciliation pass.
    ///
    /// Fetches `/carts/me` only for an authenticated user whose local cart
    /// is empty. A fetch that completes after `scope` unmounted is ignored.
    #[instrument(skip_all)]
    pub async fn reconcile(&self, scope: &ViewScope) -> ReconcileOutcome {
        if !self.user.is_authenticated() {
            debug!("guest session, skipping cart reconciliation");
            return ReconcileOutcome::Guest;
        }
        if !self.cart.is_empty() {
            debug!("local cart already populated, skipping fetch");
            return ReconcileOutcome::AlreadyLoaded;
        }

        let result = self.client.my_cart().await;
        if !scope.is_mounted() {
            debug!("view unmounted before server cart arrived");
            return ReconcileOutcome::Discarded;
        }

        match result {
            Ok(cart) => {
                if self.cart.load_if_empty(cart.items) {
                    ReconcileOutcome::Loaded {
                        lines: self.cart.len(),
                    }
                } else {
                    ReconcileOutcome::AlreadyLoaded
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to load server cart");
                ReconcileOutcome::Failed(e)
            }
        }
    }

    /// Reconcile now and again on every login or logout, until `scope`
    /// unmounts. The task ends as soon as the scope unmounts, even while
    /// waiting for the next change.
    pub fn spawn_on_auth_change(&self, scope: ViewScope) -> JoinHandle<()> {
        let this = self.clone();
        let mut changes = self.user.subscribe();
        tokio::spawn(async move {
            loop {
                this.reconcile(&scope).await;
                tokio::select! {
                    () = scope.unmounted() => break,
                    changed = changes.changed() => {
                        if changed.is_err() || !scope.is_mounted() {
                            break;
                        }
                    }
                }
            }
            debug!("cart reconciliation watcher stopped");
        })
    }
}
