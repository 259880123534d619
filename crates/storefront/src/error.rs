//! Unified error handling.
//!
//! Every layer has its own error enum; `AppError` gathers them so a caller
//! can show one message and follow one redirect. Raw response bodies never
//! reach [`AppError::user_message`].

use thiserror::Error;

use crate::backend::ApiError;
use crate::config::ConfigError;
use crate::models::ValidationError;
use crate::routes::Route;
use crate::services::{AdminError, CheckoutError, ShippingError};
use crate::stores::CartError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Shipping error: {0}")]
    Shipping(#[from] ShippingError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),
}

impl AppError {
    /// The gateway error underneath, if there is one.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e)
            | Self::Cart(CartError::Sync(e))
            | Self::Shipping(ShippingError::Api(e))
            | Self::Checkout(CheckoutError::Submission(e))
            | Self::Admin(AdminError::Api(e)) => Some(e),
            _ => None,
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        if let Some(api) = self.api_error() {
            return api_message(api).to_string();
        }
        match self {
            Self::Config(_) => "設定に誤りがあります。".to_string(),
            Self::Validation(e)
            | Self::Shipping(ShippingError::Invalid(e))
            | Self::Admin(AdminError::Validation(e)) => validation_message(e),
            Self::Cart(CartError::OutOfStock { .. }) => "この商品は在庫切れです。".to_string(),
            Self::Cart(CartError::NotInCart(_)) => "カートに該当する商品がありません。".to_string(),
            Self::Shipping(ShippingError::NotAuthenticated) => {
                "ログインしてください。".to_string()
            }
            Self::Checkout(CheckoutError::NeedsRegistration) => {
                "お届け先の住所を登録してください。".to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => "カートが空です。".to_string(),
            Self::Checkout(CheckoutError::AlreadySubmitting) => {
                "注文を処理中です。しばらくお待ちください。".to_string()
            }
            Self::Admin(AdminError::DisallowedTransition { .. }) => {
                "このステータスには変更できません。".to_string()
            }
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    /// Where to send the user, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        if self.api_error().is_some_and(ApiError::is_unauthorized) {
            return Some(Route::Login);
        }
        match self {
            Self::Checkout(e) => e.redirect(),
            Self::Shipping(ShippingError::NotAuthenticated) => Some(Route::Login),
            _ => None,
        }
    }
}

const GENERIC_FAILURE: &str = "処理に失敗しました。";

fn api_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Timeout { .. } | ApiError::Network { .. } => {
            "通信に失敗しました。時間をおいて再度お試しください。"
        }
        e if e.is_unauthorized() => "ログインの有効期限が切れました。再度ログインしてください。",
        e if e.is_conflict() => "他の操作と競合しました。最新の状態を確認してください。",
        e if e.is_not_found() => "対象が見つかりませんでした。",
        _ => GENERIC_FAILURE,
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingFields(fields) => {
            format!("必須項目が入力されていません: {}", fields.join(", "))
        }
        ValidationError::NotANumber { field, .. } => format!("{field} は数値で入力してください。"),
        ValidationError::Negative { field } => format!("{field} は0以上で入力してください。"),
        ValidationError::Email(_) => "メールアドレスの形式が正しくありません。".to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
