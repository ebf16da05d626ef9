//! Derived sales metrics.
//!
//! Read-only: this service never mutates state. All the heuristics standing
//! in for data the system does not have are named constants here, not buried
//! in queries:
//!
//! - [`ASSUMED_COST_PERCENT`]: the profit/loss report has no real cost data
//!   and assumes cost = 70% of revenue.
//! - [`MONTHLY_PROFIT_PERCENT`]: monthly bestsellers assume 30% profit.
//! - [`estimate_visitors`]: there is no traffic measurement; the dashboard
//!   derives a synthetic visitor figure from order counts.
//!
//! Best sellers degrade through an ordered strategy list rather than nested
//! fallbacks: completed-order data, then the catalog `sold_count` heuristic,
//! then a zeroed listing of the latest products. The endpoint returns the
//! first non-empty result and never fails into an error.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use backoffice_core::OrderStatus;

use crate::db::RepositoryError;
use crate::db::analytics::{
    AnalyticsRepository, CategorySalesRow, MonthlyRevenueRow, ProductSalesRow, StatusCountRow,
};

/// Assumed cost as a percentage of revenue in the profit/loss report.
pub const ASSUMED_COST_PERCENT: i64 = 70;

/// Assumed profit as a percentage of revenue for monthly bestsellers.
pub const MONTHLY_PROFIT_PERCENT: i64 = 30;

/// Result-set caps mirroring the admin UI.
const BEST_SELLERS_LIMIT: i64 = 100;
const MONTHLY_BESTSELLERS_LIMIT: i64 = 20;
const TOP_PRODUCTS_LIMIT: usize = 5;

fn percent(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// Synthetic visitor estimate: `max(orders * 10, orders + 5)`.
///
/// A placeholder for missing traffic data, not a measurement.
#[must_use]
pub const fn estimate_visitors(orders: i64) -> i64 {
    let scaled = orders * 10;
    let floor = orders + 5;
    if scaled > floor { scaled } else { floor }
}

// =============================================================================
// Response types
// =============================================================================

/// Which rung of the degradation ladder produced the best-seller data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BestSellerSource {
    /// Real aggregation over completed orders.
    CompletedOrders,
    /// Catalog heuristic: `sold_count * regular_price`.
    ProductHeuristic,
    /// Zeroed listing of the latest products.
    LatestProducts,
}

/// The ladder, tried in order; the first non-empty result wins.
pub const BEST_SELLER_STRATEGIES: [BestSellerSource; 3] = [
    BestSellerSource::CompletedOrders,
    BestSellerSource::ProductHeuristic,
    BestSellerSource::LatestProducts,
];

/// One best-selling product.
#[derive(Debug, Clone, Serialize)]
pub struct BestSeller {
    pub product_id: Option<i32>,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
}

/// Best sellers plus the strategy that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct BestSellersReport {
    pub source: BestSellerSource,
    pub products: Vec<BestSeller>,
}

/// One day of the sales trend.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: Decimal,
}

/// One month of the profit/loss report.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyProfitLoss {
    pub month: u32,
    pub month_name: &'static str,
    pub orders: i64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    /// Profit margin in percent, one decimal place; 0 when revenue is 0.
    pub margin: Decimal,
}

/// The 12-bucket profit/loss report for one year.
#[derive(Debug, Clone, Serialize)]
pub struct ProfitLossReport {
    pub year: i32,
    pub months: Vec<MonthlyProfitLoss>,
    /// 1-12; `None` when the whole year had no revenue.
    pub best_month: Option<u32>,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub overall_margin: Decimal,
}

/// One product in the monthly bestseller list.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBestseller {
    pub product_id: Option<i32>,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    /// Assumed profit at [`MONTHLY_PROFIT_PERCENT`].
    pub estimated_profit: Decimal,
}

/// Per-category sales with revenue share.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub orders: i64,
    pub revenue: Decimal,
    /// Percentage of total revenue, one decimal place.
    pub share: Decimal,
}

/// Order count and revenue over a period.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeriodTotals {
    pub orders: i64,
    pub revenue: Decimal,
}

/// Fixed five-bucket status breakdown (after synonym normalization).
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBreakdown {
    pub pending: i64,
    pub processing: i64,
    pub shipped: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// One product in the dashboard performance ranking.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPerformance {
    pub product_id: Option<i32>,
    pub name: String,
    pub total_quantity: i64,
    pub total_revenue: Decimal,
    /// Percentage of period revenue, one decimal place.
    pub revenue_share: Decimal,
}

/// The dashboard summary.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub today: PeriodTotals,
    pub week: PeriodTotals,
    pub month: PeriodTotals,
    pub period_days: i64,
    pub period: PeriodTotals,
    pub status_counts: StatusBreakdown,
    /// Synthetic estimate derived from order counts, not measured traffic.
    pub estimated_visitors: i64,
    pub top_products: Vec<ProductPerformance>,
}

// =============================================================================
// Service
// =============================================================================

/// The analytics aggregator.
pub struct AnalyticsService<'a> {
    repo: AnalyticsRepository<'a>,
}

impl<'a> AnalyticsService<'a> {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            repo: AnalyticsRepository::new(pool),
        }
    }

    /// Best sellers via the degradation ladder. Never errors: a strategy
    /// that fails or comes back empty passes to the next, and the final
    /// fallback of an empty list is still a well-formed report.
    pub async fn best_sellers(&self) -> BestSellersReport {
        for source in BEST_SELLER_STRATEGIES {
            let result = match source {
                BestSellerSource::CompletedOrders => self
                    .repo
                    .product_sales_completed(BEST_SELLERS_LIMIT)
                    .await
                    .map(|rows| rows.into_iter().map(best_seller_from_sales).collect::<Vec<_>>()),
                BestSellerSource::ProductHeuristic => self
                    .repo
                    .products_by_sold_count(BEST_SELLERS_LIMIT)
                    .await
                    .map(|rows| {
                        rows.into_iter()
                            .map(|row| BestSeller {
                                product_id: Some(row.id),
                                name: row.name,
                                total_quantity: i64::from(row.sold_count),
                                total_revenue: Decimal::from(row.sold_count)
                                    * row.regular_price,
                            })
                            .collect()
                    }),
                BestSellerSource::LatestProducts => {
                    self.repo.latest_products(BEST_SELLERS_LIMIT).await.map(|rows| {
                        rows.into_iter()
                            .map(|row| BestSeller {
                                product_id: Some(row.id),
                                name: row.name,
                                total_quantity: 0,
                                total_revenue: Decimal::ZERO,
                            })
                            .collect()
                    })
                }
            };

            match result {
                Ok(products) if !products.is_empty() => {
                    return BestSellersReport { source, products };
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(strategy = ?source, error = %e, "best-seller strategy failed");
                }
            }
        }

        BestSellersReport {
            source: BestSellerSource::LatestProducts,
            products: Vec::new(),
        }
    }

    /// Per-day order count and revenue over a lookback window, completed
    /// orders only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_trend(&self, days: i64) -> Result<Vec<TrendPoint>, RepositoryError> {
        let since = Utc::now() - Duration::days(days);
        let rows = self.repo.daily_sales_since(since).await?;

        Ok(rows
            .into_iter()
            .map(|row| TrendPoint {
                date: row.day,
                orders: row.orders,
                revenue: row.revenue,
            })
            .collect())
    }

    /// The 12-bucket monthly profit/loss report for a year. Includes ALL
    /// orders regardless of status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_profit_loss(
        &self,
        year: i32,
    ) -> Result<ProfitLossReport, RepositoryError> {
        let rows = self.repo.monthly_revenue(year).await?;
        Ok(build_profit_loss(year, &rows))
    }

    /// Per-product totals within one calendar month, completed orders only,
    /// with the assumed-profit heuristic applied.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn monthly_bestsellers(
        &self,
        year: i32,
        month: i32,
    ) -> Result<Vec<MonthlyBestseller>, RepositoryError> {
        let rows = self
            .repo
            .product_sales_for_month(year, month, MONTHLY_BESTSELLERS_LIMIT)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|row| row.total_quantity > 0)
            .map(|row| {
                let estimated_profit =
                    (row.total_revenue * percent(MONTHLY_PROFIT_PERCENT)).round_dp(2);
                MonthlyBestseller {
                    product_id: row.product_id,
                    name: row.product_name,
                    total_quantity: row.total_quantity,
                    total_revenue: row.total_revenue,
                    estimated_profit,
                }
            })
            .collect())
    }

    /// Per-product totals over a lookback window, completed orders only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_sales(
        &self,
        days: i64,
    ) -> Result<Vec<BestSeller>, RepositoryError> {
        let since = Utc::now() - Duration::days(days);
        let rows = self
            .repo
            .product_sales_since(since, BEST_SELLERS_LIMIT)
            .await?;

        Ok(rows.into_iter().map(best_seller_from_sales).collect())
    }

    /// Revenue per category with percentage shares, completed orders only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_sales(&self) -> Result<Vec<CategorySales>, RepositoryError> {
        let rows = self.repo.category_sales().await?;
        Ok(category_shares(rows))
    }

    /// The dashboard summary: fixed-window totals, status breakdown, the
    /// synthetic visitor estimate, and the top-5 product ranking for the
    /// configurable period.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn summary(&self, period_days: i64) -> Result<DashboardSummary, RepositoryError> {
        let now = Utc::now();
        let today_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map_or(now, |dt| dt.and_utc());

        let today = self.repo.totals_since(today_start).await?;
        let week = self.repo.totals_since(now - Duration::days(7)).await?;
        let month = self.repo.totals_since(now - Duration::days(30)).await?;
        let period_since = now - Duration::days(period_days);
        let period = self.repo.totals_since(period_since).await?;

        let status_rows = self.repo.status_counts().await?;
        let status_counts = status_breakdown(&status_rows);

        let top_rows = self
            .repo
            .product_sales_since(period_since, TOP_PRODUCTS_LIMIT as i64)
            .await?;
        let period = totals(period);
        let top_products = rank_by_revenue_share(top_rows, period.revenue);

        Ok(DashboardSummary {
            today: totals(today),
            week: totals(week),
            month: totals(month),
            period_days,
            estimated_visitors: estimate_visitors(period.orders),
            period,
            status_counts,
            top_products,
        })
    }
}

fn totals(row: crate::db::analytics::PeriodTotalsRow) -> PeriodTotals {
    PeriodTotals {
        orders: row.orders,
        revenue: row.revenue,
    }
}

fn best_seller_from_sales(row: ProductSalesRow) -> BestSeller {
    BestSeller {
        product_id: row.product_id,
        name: row.product_name,
        total_quantity: row.total_quantity,
        total_revenue: row.total_revenue,
    }
}

// =============================================================================
// Pure post-aggregation (unit tested without a database)
// =============================================================================

/// English month names indexed 1-12.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Build the profit/loss report: 12 fixed buckets (zeroes for missing
/// months), cost at [`ASSUMED_COST_PERCENT`], margins rounded to one
/// decimal place, best month by profit, and yearly totals.
#[must_use]
pub fn build_profit_loss(year: i32, rows: &[MonthlyRevenueRow]) -> ProfitLossReport {
    let cost_ratio = percent(ASSUMED_COST_PERCENT);

    let months: Vec<MonthlyProfitLoss> = (1..=12u32)
        .map(|month| {
            let row = rows
                .iter()
                .find(|r| u32::try_from(r.month).ok() == Some(month));
            let orders = row.map_or(0, |r| r.orders);
            let revenue = row.map_or(Decimal::ZERO, |r| r.revenue);
            let cost = (revenue * cost_ratio).round_dp(2);
            let profit = revenue - cost;
            MonthlyProfitLoss {
                month,
                month_name: MONTH_NAMES[(month - 1) as usize],
                orders,
                revenue,
                cost,
                profit,
                margin: margin_percent(profit, revenue),
            }
        })
        .collect();

    let best_month = months
        .iter()
        .filter(|m| m.revenue > Decimal::ZERO)
        .max_by_key(|m| m.profit)
        .map(|m| m.month);

    let total_revenue: Decimal = months.iter().map(|m| m.revenue).sum();
    let total_cost: Decimal = months.iter().map(|m| m.cost).sum();
    let total_profit = total_revenue - total_cost;

    ProfitLossReport {
        year,
        months,
        best_month,
        total_revenue,
        total_cost,
        total_profit,
        overall_margin: margin_percent(total_profit, total_revenue),
    }
}

/// Profit margin in percent, one decimal place; 0 when revenue is 0.
#[must_use]
pub fn margin_percent(profit: Decimal, revenue: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (profit / revenue * Decimal::ONE_HUNDRED).round_dp(1)
}

/// Compute per-category revenue shares of the grand total.
#[must_use]
pub fn category_shares(rows: Vec<CategorySalesRow>) -> Vec<CategorySales> {
    let total: Decimal = rows.iter().map(|r| r.revenue).sum();

    rows.into_iter()
        .map(|row| {
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                (row.revenue / total * Decimal::ONE_HUNDRED).round_dp(1)
            };
            CategorySales {
                category: row.category,
                orders: row.orders,
                revenue: row.revenue,
                share,
            }
        })
        .collect()
}

/// Fold raw status counts into the fixed five buckets, normalizing synonym
/// spellings; unrecognized statuses are dropped.
#[must_use]
pub fn status_breakdown(rows: &[StatusCountRow]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();

    for row in rows {
        match OrderStatus::normalize(&row.status) {
            Some(OrderStatus::Pending) => breakdown.pending += row.count,
            Some(OrderStatus::Processing) => breakdown.processing += row.count,
            Some(OrderStatus::Shipped) => breakdown.shipped += row.count,
            Some(OrderStatus::Completed) => breakdown.completed += row.count,
            Some(OrderStatus::Cancelled) => breakdown.cancelled += row.count,
            None => {}
        }
    }

    breakdown
}

/// Total orders across the breakdown buckets.
#[must_use]
pub const fn status_counts_total(breakdown: &StatusBreakdown) -> i64 {
    breakdown.pending
        + breakdown.processing
        + breakdown.shipped
        + breakdown.completed
        + breakdown.cancelled
}

/// Rank products by revenue share of the period total.
#[must_use]
pub fn rank_by_revenue_share(
    rows: Vec<ProductSalesRow>,
    period_revenue: Decimal,
) -> Vec<ProductPerformance> {
    let mut ranked: Vec<ProductPerformance> = rows
        .into_iter()
        .map(|row| {
            let revenue_share = if period_revenue.is_zero() {
                Decimal::ZERO
            } else {
                (row.total_revenue / period_revenue * Decimal::ONE_HUNDRED).round_dp(1)
            };
            ProductPerformance {
                product_id: row.product_id,
                name: row.product_name,
                total_quantity: row.total_quantity,
                total_revenue: row.total_revenue,
                revenue_share,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    ranked
}

/// Parse a trend window parameter (`7days`, `30days`, `90days`, `365days`,
/// or the bare day count).
#[must_use]
pub fn parse_trend_window(raw: &str) -> Option<i64> {
    let days = raw.trim().trim_end_matches("days").trim();
    match days.parse::<i64>() {
        Ok(d @ (7 | 30 | 90 | 365)) => Some(d),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn month_row(month: i32, orders: i64, revenue: i64) -> MonthlyRevenueRow {
        MonthlyRevenueRow {
            month,
            orders,
            revenue: Decimal::new(revenue, 0),
        }
    }

    #[test]
    fn test_profit_loss_empty_year_has_twelve_zero_buckets() {
        let report = build_profit_loss(2025, &[]);
        assert_eq!(report.months.len(), 12);
        assert!(report.months.iter().all(|m| m.revenue.is_zero()
            && m.profit.is_zero()
            && m.margin.is_zero()
            && m.orders == 0));
        assert_eq!(report.best_month, None);
        assert!(report.overall_margin.is_zero());
    }

    #[test]
    fn test_profit_loss_math() {
        let report = build_profit_loss(2025, &[month_row(3, 2, 1000)]);
        let march = &report.months[2];
        assert_eq!(march.month_name, "March");
        assert_eq!(march.orders, 2);
        assert_eq!(march.revenue, Decimal::new(1000, 0));
        // cost = 70% of revenue
        assert_eq!(march.cost, Decimal::new(70_000, 2));
        assert_eq!(march.profit, Decimal::new(30_000, 2));
        // margin = profit/revenue = 30.0%
        assert_eq!(march.margin, Decimal::new(300, 1));
        assert_eq!(report.best_month, Some(3));
    }

    #[test]
    fn test_profit_loss_best_month_by_profit() {
        let rows = [month_row(1, 1, 500), month_row(6, 1, 2000), month_row(9, 1, 800)];
        let report = build_profit_loss(2025, &rows);
        assert_eq!(report.best_month, Some(6));
        assert_eq!(report.total_revenue, Decimal::new(3300, 0));
    }

    #[test]
    fn test_margin_percent_zero_revenue() {
        assert_eq!(margin_percent(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_margin_percent_rounding() {
        // 1/3 = 33.333...% -> 33.3
        let margin = margin_percent(Decimal::ONE, Decimal::new(3, 0));
        assert_eq!(margin, Decimal::new(333, 1));
    }

    #[test]
    fn test_estimate_visitors_heuristic() {
        // orders x 10 dominates for real volumes
        assert_eq!(estimate_visitors(12), 120);
        // the +5 floor wins near zero
        assert_eq!(estimate_visitors(0), 5);
        // crossover: both formulas agree around one order
        assert_eq!(estimate_visitors(1), 10);
    }

    #[test]
    fn test_status_breakdown_normalizes_synonyms() {
        let rows = vec![
            StatusCountRow {
                status: "delivered".into(),
                count: 3,
            },
            StatusCountRow {
                status: "completed".into(),
                count: 2,
            },
            StatusCountRow {
                status: "shipping".into(),
                count: 1,
            },
            StatusCountRow {
                status: "mystery".into(),
                count: 9,
            },
        ];
        let breakdown = status_breakdown(&rows);
        assert_eq!(breakdown.completed, 5);
        assert_eq!(breakdown.shipped, 1);
        assert_eq!(breakdown.pending, 0);
        assert_eq!(status_counts_total(&breakdown), 6);
    }

    #[test]
    fn test_category_shares_sum() {
        let rows = vec![
            CategorySalesRow {
                category: "shoes".into(),
                orders: 2,
                revenue: Decimal::new(750, 0),
            },
            CategorySalesRow {
                category: "hats".into(),
                orders: 1,
                revenue: Decimal::new(250, 0),
            },
        ];
        let shares = category_shares(rows);
        assert_eq!(shares[0].share, Decimal::new(750, 1));
        assert_eq!(shares[1].share, Decimal::new(250, 1));
    }

    #[test]
    fn test_rank_by_revenue_share_caps_at_five() {
        let rows: Vec<ProductSalesRow> = (0..8)
            .map(|i| ProductSalesRow {
                product_id: Some(i),
                product_name: format!("p{i}"),
                total_quantity: 1,
                total_revenue: Decimal::new(i64::from(100 - i), 0),
            })
            .collect();
        let ranked = rank_by_revenue_share(rows, Decimal::new(1000, 0));
        assert_eq!(ranked.len(), 5);
        assert!(ranked[0].total_revenue >= ranked[4].total_revenue);
        assert_eq!(ranked[0].revenue_share, Decimal::new(100, 1));
    }

    #[test]
    fn test_parse_trend_window() {
        assert_eq!(parse_trend_window("30days"), Some(30));
        assert_eq!(parse_trend_window("7"), Some(7));
        assert_eq!(parse_trend_window("365days"), Some(365));
        assert_eq!(parse_trend_window("14days"), None);
        assert_eq!(parse_trend_window("forever"), None);
    }
}
