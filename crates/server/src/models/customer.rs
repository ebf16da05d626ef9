//! Storefront customer domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use backoffice_core::{CustomerId, CustomerStatus};

/// A storefront customer record.
///
/// Distinct from back-office [`super::User`] accounts: a `pending` customer
/// is awaiting approval to shop, not to administer.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
}
