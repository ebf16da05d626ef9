//! Reusable in-memory list filtering and sorting.
//!
//! Every admin list screen applies the same three controls over a fetched
//! list: a case-insensitive substring search, a status filter (after
//! synonym normalization), and a sort with direction. This module is that
//! logic, written once; resource types opt in by implementing [`Listable`].

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Deserialize;

use backoffice_core::OrderStatus;

use crate::models::Order;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// A sortable value extracted from a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(i64),
    Amount(Decimal),
}

/// Query parameters shared by the admin list screens.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Substring search, matched case-insensitively.
    pub search: Option<String>,
    /// Status filter; synonyms are normalized before comparison.
    pub status: Option<String>,
    /// Sort key (resource-specific, e.g. `id` or `total_amount`).
    pub sort: Option<String>,
    /// Sort direction, descending by default.
    #[serde(default)]
    pub dir: SortDir,
}

/// A row that can be searched, status-filtered, and sorted.
pub trait Listable {
    /// The text searched by the substring filter. Implementations return
    /// the concatenated searchable fields; casing is handled here.
    fn search_haystack(&self) -> String;

    /// The row's normalized status, if it carries one.
    fn status_key(&self) -> Option<OrderStatus>;

    /// The sortable value for a key; `None` for unknown keys.
    fn sort_value(&self, key: &str) -> Option<SortValue>;
}

/// Apply search, status filter, and sort over a fetched list.
///
/// Unknown status filters and unknown sort keys are ignored rather than
/// failing the request, matching the forgiving toolbar behavior.
pub fn apply<T: Listable>(mut items: Vec<T>, params: &ListParams) -> Vec<T> {
    if let Some(needle) = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let needle = needle.to_lowercase();
        items.retain(|item| item.search_haystack().to_lowercase().contains(&needle));
    }

    if let Some(status) = params
        .status
        .as_deref()
        .and_then(OrderStatus::normalize)
    {
        items.retain(|item| item.status_key() == Some(status));
    }

    if let Some(key) = params.sort.as_deref() {
        items.sort_by(|a, b| {
            let ordering = match (a.sort_value(key), b.sort_value(key)) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match params.dir {
                SortDir::Asc => ordering,
                SortDir::Desc => ordering.reverse(),
            }
        });
    }

    items
}

impl Listable for Order {
    fn search_haystack(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.id,
            self.customer_name,
            self.customer_email,
            self.shipping_address,
            self.tracking_number.as_deref().unwrap_or_default()
        )
    }

    fn status_key(&self) -> Option<OrderStatus> {
        self.normalized_status()
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        match key {
            "id" => Some(SortValue::Int(i64::from(self.id.as_i32()))),
            "total_amount" | "total" => Some(SortValue::Amount(self.total_amount)),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use backoffice_core::OrderId;
    use chrono::Utc;

    fn order(id: i32, name: &str, status: &str, total: i64) -> Order {
        Order {
            id: OrderId::new(id),
            customer_name: name.to_owned(),
            customer_email: format!("{}@example.com", name.to_lowercase()),
            shipping_address: "Jl. Sudirman 1, Jakarta".to_owned(),
            tracking_number: (id % 2 == 0).then(|| format!("TRK-{id:04}")),
            status: status.to_owned(),
            total_amount: Decimal::new(total, 0),
            items: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let orders = vec![
            order(1, "Budi", "pending", 100),
            order(2, "Sari", "pending", 200),
        ];
        let params = ListParams {
            search: Some("bUdI".to_owned()),
            ..ListParams::default()
        };
        let filtered = apply(orders, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].customer_name, "Budi");
    }

    #[test]
    fn test_search_matches_tracking_number() {
        let orders = vec![
            order(1, "Budi", "pending", 100),
            order(2, "Sari", "pending", 200),
        ];
        let params = ListParams {
            search: Some("trk-0002".to_owned()),
            ..ListParams::default()
        };
        let filtered = apply(orders, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, OrderId::new(2));
    }

    #[test]
    fn test_status_filter_normalizes_synonyms() {
        let orders = vec![
            order(1, "Budi", "completed", 100),
            order(2, "Sari", "shipped", 200),
            order(3, "Tono", "pending", 300),
        ];
        // "delivered" is a synonym for completed
        let params = ListParams {
            status: Some("delivered".to_owned()),
            ..ListParams::default()
        };
        let filtered = apply(orders, &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, OrderId::new(1));
    }

    #[test]
    fn test_unknown_status_filter_is_ignored() {
        let orders = vec![
            order(1, "Budi", "completed", 100),
            order(2, "Sari", "pending", 200),
        ];
        let params = ListParams {
            status: Some("refunded".to_owned()),
            ..ListParams::default()
        };
        assert_eq!(apply(orders, &params).len(), 2);
    }

    #[test]
    fn test_sort_by_total_amount() {
        let orders = vec![
            order(1, "Budi", "pending", 300),
            order(2, "Sari", "pending", 100),
            order(3, "Tono", "pending", 200),
        ];
        let params = ListParams {
            sort: Some("total_amount".to_owned()),
            dir: SortDir::Asc,
            ..ListParams::default()
        };
        let sorted = apply(orders, &params);
        let totals: Vec<Decimal> = sorted.iter().map(|o| o.total_amount).collect();
        assert_eq!(
            totals,
            vec![
                Decimal::new(100, 0),
                Decimal::new(200, 0),
                Decimal::new(300, 0)
            ]
        );
    }

    #[test]
    fn test_sort_by_id_desc_default_direction() {
        let orders = vec![
            order(1, "Budi", "pending", 100),
            order(3, "Sari", "pending", 100),
            order(2, "Tono", "pending", 100),
        ];
        let params = ListParams {
            sort: Some("id".to_owned()),
            ..ListParams::default()
        };
        let sorted = apply(orders, &params);
        let ids: Vec<i32> = sorted.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_all_controls_compose() {
        let orders = vec![
            order(1, "Budi", "completed", 300),
            order(2, "Budi", "complete", 100),
            order(3, "Budi", "pending", 200),
            order(4, "Sari", "completed", 400),
        ];
        let params = ListParams {
            search: Some("budi".to_owned()),
            status: Some("completed".to_owned()),
            sort: Some("total_amount".to_owned()),
            dir: SortDir::Desc,
        };
        let result = apply(orders, &params);
        let ids: Vec<i32> = result.iter().map(|o| o.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
