//! Status enums for orders and users.
//!
//! Order status transitions are decided by the backend; the client only
//! mirrors the policy so the admin console can refuse an obviously
//! disallowed change before sending it.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Preparing,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Paid,
        Self::Preparing,
        Self::Shipped,
        Self::Delivered,
        Self::Canceled,
    ];

    /// Wire code (e.g. `PENDING`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Preparing => "PREPARING",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Customer-facing label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "受注",
            Self::Paid => "支払い確認",
            Self::Preparing => "配送準備中",
            Self::Shipped => "発送済み",
            Self::Delivered => "配達済み",
            Self::Canceled => "キャンセル",
        }
    }

    /// Shipped and canceled orders accept no further transition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Shipped | Self::Canceled)
    }

    /// Whether an order in this status may move to `next`.
    ///
    /// Any non-terminal status may move to any other status.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        !self.is_terminal() && *self != next
    }

    /// Look up a status from its code (case-insensitive) or its label.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL.into_iter().find(|status| {
            status.code().eq_ignore_ascii_case(trimmed) || status.label() == trimmed
        })
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Display label for a raw status string as the backend sent it.
///
/// Known codes and labels map to the label; anything else is passed through
/// unchanged, and a missing status renders as an empty string.
#[must_use]
pub fn status_label(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(value) => OrderStatus::parse_lenient(value)
            .map_or_else(|| value.to_string(), |status| status.label().to_string()),
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
