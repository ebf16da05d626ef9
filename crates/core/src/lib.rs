//! Shared types for the back-office service.
//!
//! This crate provides common types used by the other workspace members:
//! - `server` - The back-office REST API
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, order statuses, and the permission set

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
