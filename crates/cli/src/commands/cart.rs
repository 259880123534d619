//! Cart commands.
//!
//! Without a token the cart lives only for the duration of the command.

use atelier_core::{CurrencyCode, ProductId};
use atelier_storefront::models::NewCartItem;
use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) -> Result<(), AppError> {
    let cart = state.cart();
    if cart.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }

    for item in cart.items() {
        println!(
            "{}\t{}\t{} x {}\t{}",
            item.product_id,
            item.name,
            item.price.display(CurrencyCode::default()),
            item.quantity(),
            item.subtotal().display(CurrencyCode::default()),
        );
    }
    println!(
        "{} items, total {}",
        cart.item_count(),
        cart.total().display(CurrencyCode::default())
    );
    Ok(())
}

pub async fn add(state: &AppState, product_id: ProductId, quantity: u32) -> Result<(), AppError> {
    let product = state.client().product(product_id).await?;
    let item = state
        .cart_sync()
        .add(NewCartItem::from_product(&product, quantity))
        .await?;
    tracing::info!(product_id = %item.product_id, quantity = item.quantity(), "added to cart");
    show(state)
}

pub async fn set(state: &AppState, product_id: ProductId, quantity: u32) -> Result<(), AppError> {
    let item = state.cart_sync().set_quantity(product_id, quantity).await?;
    if item.quantity() != quantity {
        tracing::info!(requested = quantity, applied = item.quantity(), "quantity limited");
    }
    show(state)
}

pub async fn remove(state: &AppState, product_id: ProductId) -> Result<(), AppError> {
    state.cart_sync().remove(product_id).await?;
    show(state)
}
