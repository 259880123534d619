//! Atelier storefront client library.
//!
//! Cart reconciliation, shipping resolution, checkout and admin flows on
//! top of the storefront backend's REST API. Nothing here renders; flows
//! return data and a [`routes::Route`] to navigate to.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod routes;
pub mod scope;
pub mod services;
pub mod session;
pub mod state;
pub mod stores;

pub use error::AppError;
pub use state::AppState;
