//! Admin console commands.

use atelier_core::{CurrencyCode, OrderStatus, status_label};
use atelier_storefront::backend::{AdminOrderFilter, OrderRef, PageRequest};
use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn orders(
    state: &AppState,
    page: u32,
    size: u32,
    status: Option<OrderStatus>,
) -> Result<(), AppError> {
    let request = PageRequest {
        page: Some(page),
        size: Some(size),
        ..PageRequest::default()
    };
    let filter = AdminOrderFilter {
        status,
        ..AdminOrderFilter::default()
    };
    let result = state.admin().orders(&request, &filter).await?;

    for order in &result.content {
        println!(
            "{}\tuser={}\t{}\t{}\t{}",
            order
                .reference()
                .map_or_else(|| "?".to_string(), ToString::to_string),
            order.user_id,
            status_label(order.status.as_deref()),
            order.total.display(CurrencyCode::default()),
            order.ordered_at.as_deref().unwrap_or_default(),
        );
    }
    println!(
        "page {} of {} ({} orders)",
        result.number + 1,
        result.total_pages.max(1),
        result.total_elements,
    );
    Ok(())
}

pub async fn order_status(state: &AppState, id: &str, status: OrderStatus) -> Result<(), AppError> {
    let reference = id
        .parse::<i64>()
        .map_or_else(|_| OrderRef::Text(id.to_string()), OrderRef::Number);
    state.admin().change_order_status(&reference, status).await?;
    tracing::info!(order = %reference, status = %status, "order status updated");
    Ok(())
}
