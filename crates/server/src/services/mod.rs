//! Business services for the back-office.
//!
//! - [`auth`] - login, session issuance, super-admin verification
//! - [`email`] - SMTP delivery of operator notifications
//! - [`analytics`] - derived sales metrics (read-only)

pub mod analytics;
pub mod auth;
pub mod email;
