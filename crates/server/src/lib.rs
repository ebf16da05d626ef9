//! Back-office REST API library.
//!
//! Serves the admin panel and the public storefront surface:
//! catalog, order lifecycle, promotions, user/customer administration, and
//! sales analytics, over JSON envelopes (`{success, data?/message?/error?}`).
//!
//! # Architecture
//!
//! - Axum handlers over a shared [`state::AppState`] (config + `PgPool`)
//! - [`middleware::auth`] bearer-token gate on all `/api/admin/*` routes
//! - Repository structs per aggregate in [`db`], domain types in [`models`]
//! - Versioned sqlx migrations run via `backoffice-cli migrate`, never at
//!   request time

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
