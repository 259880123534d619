//! Lifetime guard for work started on behalf of a view.

use std::sync::Arc;

use tokio::sync::watch;

/// "Is the view that asked for this still there?"
///
/// Clones share the flag. Results that arrive after [`unmount`] are to be
/// dropped by whoever checks [`is_mounted`]; long-running tasks can await
/// [`unmounted`] instead.
///
/// [`unmount`]: Self::unmount
/// [`is_mounted`]: Self::is_mounted
/// [`unmounted`]: Self::unmounted
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<watch::Sender<bool>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        let (mounted, _) = watch::channel(true);
        Self {
            mounted: Arc::new(mounted),
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }

    /// Resolves once the scope is unmounted, immediately if it already is.
    pub async fn unmounted(&self) {
        let mut rx = self.mounted.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|mounted| !mounted).await;
    }
}
