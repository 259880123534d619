//! Canonical cart line shape held by the cart store.

use atelier_core::{CartItemId, Price, ProductId};
use serde::{Deserialize, Serialize};

use crate::backend::Product;

/// Most units of one product a single customer may buy.
pub const PER_PERSON_LIMIT: u32 = 2;

/// Upper bound applied even when nothing else limits a line.
pub const SAFETY_MAX: u32 = 999;

/// A line in the cart.
///
/// `quantity` and `subtotal` are only changed together, through the store,
/// so `subtotal == price × quantity` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Server line id once persisted, otherwise a local placeholder.
    pub id: CartItemId,
    /// True while the line exists only on this client.
    #[serde(default)]
    pub local: bool,
    pub product_id: ProductId,
    pub name: String,
    /// Unit price when the line was added.
    pub price: Price,
    quantity: u32,
    subtotal: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Stock snapshot used for clamping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl CartItem {
    pub(crate) fn new(id: CartItemId, local: bool, line: NewCartItem) -> Self {
        let NewCartItem {
            product_id,
            name,
            price,
            quantity,
            image_url,
            color,
            size,
            stock,
        } = line;

        Self {
            id,
            local,
            product_id,
            name,
            price,
            quantity,
            subtotal: price.times(quantity),
            image_url,
            color,
            size,
            stock,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity`.
    #[must_use]
    pub const fn subtotal(&self) -> Price {
        self.subtotal
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.subtotal = self.price.times(quantity);
    }

    /// The line as a fresh addition, e.g. to replay it into another cart.
    #[must_use]
    pub fn to_new_item(&self) -> NewCartItem {
        NewCartItem {
            product_id: self.product_id,
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            image_url: self.image_url.clone(),
            color: self.color.clone(),
            size: self.size.clone(),
            stock: self.stock,
        }
    }
}

/// A line about to be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

impl NewCartItem {
    /// `quantity` units of a catalog product at its list price.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity,
            image_url: product.primary_image().map(ToString::to_string),
            color: None,
            size: None,
            stock: product.stock,
        }
    }
}

/// Quantity bounds for cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityLimits {
    pub per_person: u32,
    pub safety_max: u32,
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self {
            per_person: PER_PERSON_LIMIT,
            safety_max: SAFETY_MAX,
        }
    }
}

impl QuantityLimits {
    /// Highest quantity allowed for a product with the given stock.
    ///
    /// Zero when the product is known to be out of stock.
    #[must_use]
    pub fn limit_for(&self, stock: Option<u32>) -> u32 {
        let limit = self.per_person.min(self.safety_max);
        stock.map_or(limit, |stock| limit.min(stock))
    }

    /// Clamp `quantity` into `[1, limit_for(stock)]`.
    ///
    /// Never returns less than 1; callers must check
    /// [`limit_for`](Self::limit_for) first to refuse sold-out products.
    #[must_use]
    pub fn clamp(&self, quantity: u32, stock: Option<u32>) -> u32 {
        quantity.min(self.limit_for(stock)).max(1)
    }
}
