//! Order history.

use atelier_storefront::backend::conversions::convert_order;
use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn history(state: &AppState) -> Result<(), AppError> {
    super::require_user(state)?;
    let orders: Vec<_> = state
        .client()
        .order_history()
        .await?
        .into_iter()
        .map(convert_order)
        .collect();

    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for order in orders {
        println!(
            "#{}\t{}\t{}\t{}",
            order.order_number,
            order.ordered_at_label(),
            order.status_label,
            order.total_label(),
        );
        for line in &order.items {
            println!("    {} x {}", line.product_name, line.quantity);
        }
    }
    Ok(())
}
