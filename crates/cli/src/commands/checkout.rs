//! Order placement.

use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn run(state: &AppState) -> Result<(), AppError> {
    super::require_user(state)?;
    let shipping = state.shipping().load().await?;

    let submitted = state
        .checkout()
        .submit(&shipping, &state.cart().items())
        .await?;

    let completion = state.completion();
    let Ok(marker) = completion.enter() else {
        tracing::warn!("order placed but the completion marker is missing");
        return Ok(());
    };

    println!("Order placed");
    println!("  Order number: {}", marker.order_number);
    println!("  Ordered at:   {}", marker.ordered_at);
    println!("  Total:        {}", submitted.order.total_label());
    for line in &submitted.order.items {
        println!("  - {} x {}", line.product_name, line.quantity);
    }

    let next = completion.finish().await;
    tracing::debug!(next = %next, "completion view closed");
    Ok(())
}
