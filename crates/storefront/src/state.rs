//! Shared client state and the flows wired to it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::warn;

use crate::backend::{ApiError, BackendClient};
use crate::config::StorefrontConfig;
use crate::events::EventBus;
use crate::services::{
    AdminConsole, CartReconciler, CartSync, CheckoutFlow, CompletionView, PendingCartBridge,
    ProductLookup, ShippingService,
};
use crate::session::Session;
use crate::stores::{CartStore, UserStore};

/// Everything the flows share.
///
/// Cheaply cloneable via `Arc`; every flow built from it sees the same
/// stores, session and backend client. Stateless flows are built on
/// demand; the shipping service and checkout flow are held once. The
/// shipping service's event listener runs for as long as the state does.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    client: BackendClient,
    cart: CartStore,
    user: UserStore,
    session: Session,
    events: EventBus,
    shipping: ShippingService,
    checkout: CheckoutFlow,
    shipping_listener: JoinHandle<()>,
}

impl Drop for AppStateInner {
    fn drop(&mut self) {
        self.shipping_listener.abort();
    }
}

impl AppState {
    /// Create the state with in-memory session storage.
    ///
    /// A 401 or 403 from the backend signs the user out of the
    /// [`UserStore`]; the client drops its token on its own.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be constructed.
    pub async fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        Self::with_session(config, Session::default()).await
    }

    /// Create the state on top of an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client cannot be constructed.
    pub async fn with_session(config: StorefrontConfig, session: Session) -> Result<Self, ApiError> {
        let client = BackendClient::new(&config)?;
        let user = UserStore::new();

        let signed_in = user.clone();
        client
            .on_unauthorized(Arc::new(move |status| {
                warn!(status, "backend rejected credentials, signing out");
                signed_in.clear_user();
            }))
            .await;

        let cart = CartStore::default();
        let events = EventBus::new();
        let shipping = ShippingService::new(
            client.clone(),
            user.clone(),
            session.clone(),
            events.clone(),
        );
        let shipping_listener = shipping.spawn_event_listener();
        let checkout = CheckoutFlow::new(client.clone(), cart.clone(), session.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                cart,
                user,
                session,
                events,
                shipping,
                checkout,
                shipping_listener,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    #[must_use]
    pub fn user(&self) -> &UserStore {
        &self.inner.user
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    // =========================================================================
    // Flows
    // =========================================================================

    #[must_use]
    pub fn reconciler(&self) -> CartReconciler {
        CartReconciler::new(self.client().clone(), self.cart().clone(), self.user().clone())
    }

    #[must_use]
    pub fn cart_sync(&self) -> CartSync {
        CartSync::new(self.client().clone(), self.cart().clone(), self.user().clone())
    }

    #[must_use]
    pub fn pending_cart(&self) -> PendingCartBridge {
        PendingCartBridge::new(self.session().clone(), self.cart_sync())
    }

    #[must_use]
    pub fn products(&self) -> ProductLookup {
        ProductLookup::new(self.client().clone())
    }

    /// The shared shipping service; its address book and selection are
    /// seen by every caller.
    #[must_use]
    pub fn shipping(&self) -> &ShippingService {
        &self.inner.shipping
    }

    /// The shared checkout flow, so at most one submit is ever in flight.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutFlow {
        &self.inner.checkout
    }

    #[must_use]
    pub fn completion(&self) -> CompletionView {
        CompletionView::new(self.session().clone(), self.config().completion_display)
    }

    #[must_use]
    pub fn admin(&self) -> AdminConsole {
        AdminConsole::new(self.client().clone())
    }
}
