//! Product enrichment for cart and order lines.

use std::collections::{BTreeSet, HashMap};

use atelier_core::ProductId;
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::backend::{BackendClient, Product};

/// Image shown when a product has none or could not be loaded.
pub const NO_IMAGE: &str = "/images/no-image.png";

/// Products keyed by ID.
pub type ProductMap = HashMap<ProductId, Product>;

/// Resolves product IDs to product records.
#[derive(Clone)]
pub struct ProductLookup {
    client: BackendClient,
}

impl ProductLookup {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Fetch the products for `ids`.
    ///
    /// Tries one batched request first. If that fails or comes back empty,
    /// fetches each product individually in parallel and silently drops
    /// the ones that fail. Never fails as a whole.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn resolve(&self, ids: &[ProductId]) -> ProductMap {
        let unique: Vec<ProductId> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return ProductMap::new();
        }

        match self.client.products_by_ids(&unique).await {
            Ok(products) if !products.is_empty() => {
                return products.into_iter().map(|p| (p.id, p)).collect();
            }
            Ok(_) => debug!("batch product lookup returned nothing, falling back"),
            Err(e) => debug!(error = %e, "batch product lookup failed, falling back"),
        }

        let fetches = unique.iter().map(|&id| self.client.product(id));
        join_all(fetches)
            .await
            .into_iter()
            .zip(&unique)
            .filter_map(|(result, id)| match result {
                Ok(product) => Some((product.id, product)),
                Err(e) => {
                    warn!(product_id = %id, error = %e, "product lookup failed");
                    None
                }
            })
            .collect()
    }
}

/// Name to show for a product, falling back to its ID.
#[must_use]
pub fn display_name(products: &ProductMap, id: ProductId) -> String {
    products
        .get(&id)
        .map(|p| p.name.trim())
        .filter(|name| !name.is_empty())
        .map_or_else(|| id.to_string(), ToString::to_string)
}

/// Image to show for a product, preferring the line's own image.
#[must_use]
pub fn display_image<'a>(
    products: &'a ProductMap,
    id: ProductId,
    line_image: Option<&'a str>,
) -> &'a str {
    line_image
        .filter(|url| !url.is_empty())
        .or_else(|| products.get(&id).and_then(Product::primary_image))
        .unwrap_or(NO_IMAGE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product(id: i64, name: &str, images: &[&str]) -> Product {
        serde_json::from_value(json!({
            "id": id, "name": name, "price": 1000, "imageUrls": images
        }))
        .unwrap()
    }

    #[test]
    fn test_display_name_fallback() {
        let mut map = ProductMap::new();
        map.insert(ProductId::new(1), product(1, "Linen shirt", &[]));
        assert_eq!(display_name(&map, ProductId::new(1)), "Linen shirt");
        assert_eq!(display_name(&map, ProductId::new(2)), "2");
    }

    #[test]
    fn test_display_image_fallbacks() {
        let mut map = ProductMap::new();
        map.insert(ProductId::new(1), product(1, "A", &["/img/a.jpg"]));
        map.insert(ProductId::new(2), product(2, "B", &[]));

        assert_eq!(display_image(&map, ProductId::new(1), Some("/img/line.jpg")), "/img/line.jpg");
        assert_eq!(display_image(&map, ProductId::new(1), None), "/img/a.jpg");
        assert_eq!(display_image(&map, ProductId::new(2), None), NO_IMAGE);
        assert_eq!(display_image(&map, ProductId::new(3), Some("")), NO_IMAGE);
    }
}
