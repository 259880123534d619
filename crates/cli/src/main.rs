//! Atelier CLI - storefront and admin operations from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Look up products
//! atelier products show 7 12
//!
//! # Work with the signed-in user's cart (needs ATELIER_API_TOKEN)
//! atelier cart show
//! atelier cart add 7 1
//! atelier cart set 7 2
//! atelier cart remove 7
//!
//! # Check the shipping address and place the order
//! atelier shipping show
//! atelier checkout
//!
//! # Past orders
//! atelier orders history
//!
//! # Admin
//! atelier admin orders --page 0 --size 20
//! atelier admin order-status 1024 SHIPPED
//! ```
//!
//! Configuration comes from the environment (or `.env`); see
//! `atelier_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use atelier_core::{OrderStatus, ProductId};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect the shipping address
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
    /// Place an order for the current cart
    Checkout,
    /// Past orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// Show products by ID
    Show {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add { product: i64, quantity: u32 },
    /// Set a product's quantity
    Set { product: i64, quantity: u32 },
    /// Remove a product
    Remove { product: i64 },
}

#[derive(Subcommand)]
enum ShippingAction {
    /// Show where an order would ship to
    Show,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Show past orders
    History,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List orders
    Orders {
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size
        #[arg(long, default_value_t = 20)]
        size: u32,

        /// Only orders in this status
        #[arg(long)]
        status: Option<OrderStatus>,
    },
    /// Move an order to a new status
    OrderStatus {
        /// Order ID
        id: String,

        /// New status (code such as `SHIPPED`, or its label)
        status: OrderStatus,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("atelier_storefront=info,atelier_cli=info")),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let state = commands::connect().await?;

    let outcome = match cli.command {
        Commands::Products {
            action: ProductsAction::Show { ids },
        } => {
            let ids: Vec<ProductId> = ids.into_iter().map(ProductId::new).collect();
            commands::products::show(&state, &ids).await
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { product, quantity } => {
                commands::cart::add(&state, ProductId::new(product), quantity).await
            }
            CartAction::Set { product, quantity } => {
                commands::cart::set(&state, ProductId::new(product), quantity).await
            }
            CartAction::Remove { product } => {
                commands::cart::remove(&state, ProductId::new(product)).await
            }
        },
        Commands::Shipping {
            action: ShippingAction::Show,
        } => commands::shipping::show(&state).await,
        Commands::Checkout => commands::checkout::run(&state).await,
        Commands::Orders {
            action: OrdersAction::History,
        } => commands::orders::history(&state).await,
        Commands::Admin { action } => match action {
            AdminAction::Orders { page, size, status } => {
                commands::admin::orders(&state, page, size, status).await
            }
            AdminAction::OrderStatus { id, status } => {
                commands::admin::order_status(&state, &id, status).await
            }
        },
    };

    outcome.map_err(|e| {
        if let Some(route) = e.redirect() {
            tracing::info!(next = %route, "{}", e.user_message());
        } else {
            tracing::warn!("{}", e.user_message());
        }
        e.into()
    })
}
