//! Command implementations.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod shipping;

use atelier_storefront::config::StorefrontConfig;
use atelier_storefront::scope::ViewScope;
use atelier_storefront::services::ReconcileOutcome;
use atelier_storefront::{AppError, AppState};

/// Build the client state from the environment.
///
/// With a token configured the profile is fetched so the flows see a
/// signed-in user, and the server cart is loaded into the local one.
pub async fn connect() -> Result<AppState, AppError> {
    let config = StorefrontConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");
    let has_token = config.api_token.is_some();
    let state = AppState::new(config).await?;

    if has_token {
        let me = state.client().me().await?;
        tracing::debug!(user_id = %me.id, "signed in");
        state.user().set_user(me);

        if let ReconcileOutcome::Failed(e) = state.reconciler().reconcile(&ViewScope::new()).await {
            return Err(e.into());
        }
    }
    Ok(state)
}

/// Require a signed-in user.
pub fn require_user(state: &AppState) -> Result<(), AppError> {
    if state.user().is_authenticated() {
        Ok(())
    } else {
        Err(atelier_storefront::services::ShippingError::NotAuthenticated.into())
    }
}
