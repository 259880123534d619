//! Shipping address resolution.

use atelier_storefront::routes::Route;
use atelier_storefront::services::ShippingSource;
use atelier_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState) -> Result<(), AppError> {
    super::require_user(state)?;
    let resolution = state.shipping().load().await?;

    let Some(selected) = resolution.selected else {
        println!("No shipping address; register one at {}", Route::AddressRegistration);
        return Ok(());
    };

    let source = match resolution.source {
        Some(ShippingSource::SessionSelection) => "chosen this session".to_string(),
        Some(ShippingSource::AddressBook(id)) => format!("address book #{id}"),
        Some(ShippingSource::Profile) | None => "profile".to_string(),
    };
    let field = |value: Option<String>| value.unwrap_or_default();

    println!("Ship to ({source}):");
    println!("  {}", field(selected.name));
    println!(
        "  〒{} {}{}{} {}",
        field(selected.postal_code),
        field(selected.prefecture),
        field(selected.city),
        field(selected.address_line1),
        field(selected.address_line2),
    );
    if let Some(phone) = selected.phone_number {
        println!("  {phone}");
    }
    Ok(())
}
