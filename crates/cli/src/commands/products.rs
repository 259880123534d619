//! Product lookup.

use atelier_core::{CurrencyCode, ProductId};
use atelier_storefront::services::products::{display_image, display_name};
use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState, ids: &[ProductId]) -> Result<(), AppError> {
    let products = state.products().resolve(ids).await;

    for &id in ids {
        match products.get(&id) {
            Some(product) => println!(
                "{id}\t{}\t{}\tstock={}\t{}",
                display_name(&products, id),
                product.price.display(CurrencyCode::default()),
                product
                    .stock
                    .map_or_else(|| "-".to_string(), |stock| stock.to_string()),
                display_image(&products, id, None),
            ),
            None => println!("{id}\t(not found)"),
        }
    }
    Ok(())
}
