//! Delivery address book.

use atelier_core::AddressId;
use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints;
use crate::backend::{Address, AddressUpsert, Result};

impl BackendClient {
    /// The caller's saved delivery addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn my_addresses(&self) -> Result<Vec<Address>> {
        let addresses: Option<Vec<Address>> = self.get(endpoints::MY_ADDRESSES).await?;
        Ok(addresses.unwrap_or_default())
    }

    /// Save a new delivery address. The payload is sanitized first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, address))]
    pub async fn create_address(&self, address: AddressUpsert) -> Result<Address> {
        self.post(endpoints::ADDRESSES, &address.sanitize()).await
    }

    /// Update a saved delivery address. The payload is sanitized first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, address), fields(address_id = %id))]
    pub async fn update_address(&self, id: AddressId, address: AddressUpsert) -> Result<Address> {
        self.put(&endpoints::address(id), &address.sanitize()).await
    }

    /// Delete a saved delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: AddressId) -> Result<()> {
        self.delete(&endpoints::address(id)).await?;
        Ok(())
    }
}
