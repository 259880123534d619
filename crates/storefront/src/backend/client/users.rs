//! The caller's own profile.

use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints;
use crate::backend::{Result, UserProfile, UserUpdate};

impl BackendClient {
    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile> {
        self.get(endpoints::ME).await
    }

    /// Update the authenticated user's profile. Unset fields are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &UserUpdate) -> Result<UserProfile> {
        self.put(endpoints::ME, update).await
    }
}
