//! Which address an order ships to.
//!
//! Precedence, first match wins:
//! 1. the address the user picked this session
//! 2. the first usable address book entry
//! 3. the address on the user's profile
//!
//! With none of those (or no user) the user must register an address
//! before checking out.

use std::sync::Arc;

use atelier_core::{AddressId, UserId};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::backend::{Address, ApiError, BackendClient, UserProfile};
use crate::events::{EventBus, StoreEvent};
use crate::models::session::keys;
use crate::models::{ShippingSelection, ValidationError};
use crate::session::Session;
use crate::stores::UserStore;

#[derive(Debug, Clone, Error)]
pub enum ShippingError {
    #[error("Sign in to choose a shipping address")]
    NotAuthenticated,

    #[error("Incomplete address: {0}")]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where the resolved address came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingSource {
    SessionSelection,
    AddressBook(AddressId),
    Profile,
}

/// Outcome of shipping resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingResolution {
    pub needs_registration: bool,
    pub selected: Option<ShippingSelection>,
    pub source: Option<ShippingSource>,
}

impl ShippingResolution {
    #[must_use]
    pub const fn needs_registration() -> Self {
        Self {
            needs_registration: true,
            selected: None,
            source: None,
        }
    }

    const fn found(selected: ShippingSelection, source: ShippingSource) -> Self {
        Self {
            needs_registration: false,
            selected: Some(selected),
            source: Some(source),
        }
    }
}

/// Decide the shipping address from what is known about the user.
///
/// Invalid candidates are skipped, so an unusable session selection or
/// address book entry falls through to the next source.
#[must_use]
pub fn resolve_shipping(
    user: Option<&UserProfile>,
    address_book: &[Address],
    session_selection: Option<&ShippingSelection>,
) -> ShippingResolution {
    let Some(user) = user else {
        return ShippingResolution::needs_registration();
    };

    if let Some(selection) = session_selection.filter(|s| s.is_valid()) {
        return ShippingResolution::found(selection.clone(), ShippingSource::SessionSelection);
    }

    if let Some((address, selection)) = address_book
        .iter()
        .map(|a| (a, ShippingSelection::from_address(a)))
        .find(|(_, selection)| selection.is_valid())
    {
        return ShippingResolution::found(selection, ShippingSource::AddressBook(address.id));
    }

    let profile = ShippingSelection::from_profile(user);
    if profile.is_valid() {
        return ShippingResolution::found(profile, ShippingSource::Profile);
    }

    ShippingResolution::needs_registration()
}

// =============================================================================
// ShippingService
// =============================================================================

/// A cached value and the user it was loaded for.
#[derive(Debug, Default)]
struct Owned<T> {
    owner: Option<UserId>,
    value: T,
}

impl<T> Owned<T> {
    const fn new(owner: Option<UserId>, value: T) -> Self {
        Self { owner, value }
    }

    /// The value, if it was loaded for `user`.
    fn for_user(&self, user: Option<UserId>) -> Option<&T> {
        (self.owner.is_some() && self.owner == user).then_some(&self.value)
    }
}

/// Keeps the address book and session selection current and resolves the
/// shipping address from them.
#[derive(Clone)]
pub struct ShippingService {
    client: BackendClient,
    user: UserStore,
    session: Session,
    events: EventBus,
    address_book: Arc<RwLock<Owned<Vec<Address>>>>,
    selection: Arc<RwLock<Owned<Option<ShippingSelection>>>>,
}

impl ShippingService {
    #[must_use]
    pub fn new(client: BackendClient, user: UserStore, session: Session, events: EventBus) -> Self {
        Self {
            client,
            user,
            session,
            events,
            address_book: Arc::new(RwLock::new(Owned::default())),
            selection: Arc::new(RwLock::new(Owned::default())),
        }
    }

    /// Re-fetch the address book. Guests get an empty book.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::Api` if the list cannot be fetched; the
    /// previous book is kept.
    #[instrument(skip(self))]
    pub async fn reload_address_book(&self) -> Result<Vec<Address>, ShippingError> {
        let book = if self.user.is_authenticated() {
            self.client.my_addresses().await?
        } else {
            Vec::new()
        };
        *self.address_book.write().await = Owned::new(self.user.user_id(), book.clone());
        Ok(book)
    }

    /// Re-read the user's session selection. Invalid selections are ignored.
    pub async fn refresh_selection(&self) -> Option<ShippingSelection> {
        let owner = self.user.user_id();
        let selection = owner
            .and_then(|id| self.session.get::<ShippingSelection>(&keys::shipping_selection(id)))
            .filter(ShippingSelection::is_valid);
        *self.selection.write().await = Owned::new(owner, selection.clone());
        selection
    }

    /// Resolve from the cached book and selection.
    ///
    /// Anything cached for a different user than the current one is
    /// ignored.
    pub async fn resolve(&self) -> ShippingResolution {
        let user = self.user.current();
        let owner = user.as_ref().map(|u| u.id);
        let book = self.address_book.read().await;
        let selection = self.selection.read().await;
        resolve_shipping(
            user.as_ref(),
            book.for_user(owner).map_or(&[][..], Vec::as_slice),
            selection.for_user(owner).and_then(Option::as_ref),
        )
    }

    /// Refresh everything, then resolve.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::Api` if the address book cannot be fetched.
    pub async fn load(&self) -> Result<ShippingResolution, ShippingError> {
        self.reload_address_book().await?;
        self.refresh_selection().await;
        Ok(self.resolve().await)
    }

    /// Use `selection` for this session's checkout.
    ///
    /// When the address book is still empty the selection is also saved as
    /// its first entry (and copied to a profile without an address).
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::Invalid` for an incomplete address,
    /// `ShippingError::NotAuthenticated` for guests, `ShippingError::Api`
    /// if saving the first entry fails.
    #[instrument(skip(self, selection))]
    pub async fn choose(&self, selection: ShippingSelection) -> Result<(), ShippingError> {
        selection.validate()?;
        let user = self.user.current().ok_or(ShippingError::NotAuthenticated)?;

        if self.reload_address_book().await?.is_empty() {
            self.save_first_address(&user, &selection).await?;
        }

        self.remember(&user, selection).await;
        Ok(())
    }

    /// Ship to the address on the profile.
    ///
    /// # Errors
    ///
    /// Same as [`choose`](Self::choose); `ShippingError::Invalid` if the
    /// profile address is incomplete.
    pub async fn use_profile_address(&self) -> Result<ShippingSelection, ShippingError> {
        let user = self.user.current().ok_or(ShippingError::NotAuthenticated)?;
        let selection = ShippingSelection::from_profile(&user);
        self.choose(selection.clone()).await?;
        Ok(selection)
    }

    /// Add a new address book entry and ship to it.
    ///
    /// The first entry an account saves is also copied to its profile if
    /// the profile has no address yet.
    ///
    /// # Errors
    ///
    /// Returns `ShippingError::Invalid` for an incomplete address,
    /// `ShippingError::NotAuthenticated` for guests, `ShippingError::Api`
    /// if the backend refuses.
    #[instrument(skip(self, selection))]
    pub async fn register_address(&self, selection: ShippingSelection) -> Result<Address, ShippingError> {
        selection.validate()?;
        let user = self.user.current().ok_or(ShippingError::NotAuthenticated)?;

        let was_empty = self.reload_address_book().await?.is_empty();
        let address = self.client.create_address(selection.to_address_upsert()).await?;
        self.address_book.write().await.value.push(address.clone());
        self.events.publish(StoreEvent::AddressBookChanged);
        if was_empty {
            self.copy_to_profile_if_missing(&user, &selection).await?;
        }

        self.remember(&user, selection).await;
        Ok(address)
    }

    /// React to bus events until the bus closes.
    ///
    /// [`AppState`](crate::AppState) starts one listener per state and stops
    /// it when the state is dropped.
    pub fn spawn_event_listener(&self) -> JoinHandle<()> {
        let this = self.clone();
        let mut rx = self.events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(StoreEvent::AddressBookChanged) => {
                        if let Err(e) = this.reload_address_book().await {
                            warn!(error = %e, "failed to reload address book");
                        }
                    }
                    Ok(StoreEvent::ShippingSelectionChanged { user_id }) => {
                        if this.user.user_id() == Some(user_id) {
                            this.refresh_selection().await;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "shipping listener lagged, refreshing everything");
                        if let Err(e) = this.reload_address_book().await {
                            warn!(error = %e, "failed to reload address book");
                        }
                        this.refresh_selection().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn remember(&self, user: &UserProfile, selection: ShippingSelection) {
        self.session
            .insert(&keys::shipping_selection(user.id), &selection);
        *self.selection.write().await = Owned::new(Some(user.id), Some(selection));
        self.events
            .publish(StoreEvent::ShippingSelectionChanged { user_id: user.id });
    }

    async fn save_first_address(
        &self,
        user: &UserProfile,
        selection: &ShippingSelection,
    ) -> Result<(), ShippingError> {
        let address = self.client.create_address(selection.to_address_upsert()).await?;
        info!(address_id = %address.id, "saved first address book entry");
        self.address_book.write().await.value.push(address);
        self.events.publish(StoreEvent::AddressBookChanged);
        self.copy_to_profile_if_missing(user, selection).await
    }

    async fn copy_to_profile_if_missing(
        &self,
        user: &UserProfile,
        selection: &ShippingSelection,
    ) -> Result<(), ShippingError> {
        if user.has_address() {
            return Ok(());
        }
        let updated = self.client.update_me(&selection.to_user_update()).await?;
        info!("copied first address to profile");
        self.user.set_user(updated);
        Ok(())
    }
}
