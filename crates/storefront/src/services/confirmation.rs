//! Guard for the order completion view.

use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::models::CompletedOrder;
use crate::models::session::keys;
use crate::routes::Route;
use crate::session::Session;

/// The completion view: only reachable right after a checkout.
#[derive(Clone)]
pub struct CompletionView {
    session: Session,
    display_for: Duration,
}

impl CompletionView {
    #[must_use]
    pub const fn new(session: Session, display_for: Duration) -> Self {
        Self {
            session,
            display_for,
        }
    }

    /// Enter the view.
    ///
    /// # Errors
    ///
    /// Returns `Route::Cart` when there is no unexpired completion marker;
    /// an expired marker is removed.
    pub fn enter(&self) -> Result<CompletedOrder, Route> {
        let Some(marker) = self.session.get::<CompletedOrder>(keys::CHECKOUT_COMPLETED) else {
            debug!("no completion marker, redirecting to cart");
            return Err(Route::Cart);
        };
        if marker.is_expired(Utc::now()) {
            debug!("completion marker expired, redirecting to cart");
            self.session.remove(keys::CHECKOUT_COMPLETED);
            return Err(Route::Cart);
        }
        Ok(marker)
    }

    /// Wait out the display time, consume the marker and head back to the
    /// product list.
    pub async fn finish(&self) -> Route {
        tokio::time::sleep(self.display_for).await;
        self.session.remove(keys::CHECKOUT_COMPLETED);
        Route::Products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::OrderId;

    use super::*;

    fn marker(expires_in_secs: i64) -> CompletedOrder {
        CompletedOrder {
            order_id: OrderId::new(9),
            order_number: "9".to_string(),
            ordered_at: "2025年07月30日 22:15".to_string(),
            expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
        }
    }

    #[test]
    fn test_enter_without_marker_redirects_to_cart() {
        let view = CompletionView::new(Session::default(), Duration::from_secs(5));
        assert_eq!(view.enter().unwrap_err(), Route::Cart);
    }

    #[test]
    fn test_enter_with_marker() {
        let session = Session::default();
        session.insert(keys::CHECKOUT_COMPLETED, &marker(60));
        let view = CompletionView::new(session, Duration::from_secs(5));
        assert_eq!(view.enter().unwrap().order_number, "9");
    }

    #[test]
    fn test_expired_marker_is_removed() {
        let session = Session::default();
        session.insert(keys::CHECKOUT_COMPLETED, &marker(-1));
        let view = CompletionView::new(session.clone(), Duration::from_secs(5));
        assert_eq!(view.enter().unwrap_err(), Route::Cart);
        assert!(session.get::<CompletedOrder>(keys::CHECKOUT_COMPLETED).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_consumes_marker() {
        let session = Session::default();
        session.insert(keys::CHECKOUT_COMPLETED, &marker(60));
        let view = CompletionView::new(session.clone(), Duration::from_secs(5));

        view.enter().unwrap();
        assert_eq!(view.finish().await, Route::Products);
        assert_eq!(view.enter().unwrap_err(), Route::Cart);
    }
}
