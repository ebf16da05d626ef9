//! Admin analytics endpoints.
//!
//! All read-only; all behind the auth gate with the `view_analytics`
//! capability. The heavy lifting lives in
//! [`crate::services::analytics::AnalyticsService`].

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use backoffice_core::Permission;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::analytics::{
    AnalyticsService, BestSeller, BestSellersReport, CategorySales, DashboardSummary,
    MonthlyBestseller, ProfitLossReport, TrendPoint, parse_trend_window,
};
use crate::state::AppState;

use super::ApiResponse;

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/best-sellers", get(best_sellers))
        .route("/product-sales", get(product_sales))
        .route("/category-sales", get(category_sales))
        .route("/sales-trend", get(sales_trend))
        .route("/monthly-profit-loss", get(monthly_profit_loss))
        .route("/monthly-bestsellers", get(monthly_bestsellers))
        .route("/summary", get(summary))
}

/// Best sellers via the degradation ladder; always returns data, never an
/// error, even on an empty database.
async fn best_sellers(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BestSellersReport>>, AppError> {
    user.require(Permission::ViewAnalytics)?;
    let report = AnalyticsService::new(state.pool()).best_sellers().await;
    Ok(ApiResponse::ok(report))
}

#[derive(Debug, Deserialize)]
struct DaysQuery {
    days: Option<i64>,
}

async fn product_sales(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<ApiResponse<Vec<BestSeller>>>, AppError> {
    user.require(Permission::ViewAnalytics)?;

    let days = query.days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return Err(AppError::Validation(
            "days must be between 1 and 365".to_owned(),
        ));
    }

    let sales = AnalyticsService::new(state.pool()).product_sales(days).await?;
    Ok(ApiResponse::ok(sales))
}

async fn category_sales(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategorySales>>>, AppError> {
    user.require(Permission::ViewAnalytics)?;
    let sales = AnalyticsService::new(state.pool()).category_sales().await?;
    Ok(ApiResponse::ok(sales))
}

#[derive(Debug, Deserialize)]
struct TrendQuery {
    /// `7days`, `30days`, `90days`, or `365days`.
    window: Option<String>,
}

async fn sales_trend(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<ApiResponse<Vec<TrendPoint>>>, AppError> {
    user.require(Permission::ViewAnalytics)?;

    let days = match query.window.as_deref() {
        None => 30,
        Some(raw) => parse_trend_window(raw).ok_or_else(|| {
            AppError::Validation(format!("Unknown trend window: {raw}"))
        })?,
    };

    let trend = AnalyticsService::new(state.pool()).sales_trend(days).await?;
    Ok(ApiResponse::ok(trend))
}

#[derive(Debug, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

async fn monthly_profit_loss(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<ApiResponse<ProfitLossReport>>, AppError> {
    user.require(Permission::ViewAnalytics)?;

    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let report = AnalyticsService::new(state.pool())
        .monthly_profit_loss(year)
        .await?;
    Ok(ApiResponse::ok(report))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    year: Option<i32>,
    month: Option<i32>,
}

async fn monthly_bestsellers(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<Vec<MonthlyBestseller>>>, AppError> {
    user.require(Permission::ViewAnalytics)?;

    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| {
        i32::try_from(now.month()).unwrap_or(1)
    });
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation(
            "month must be between 1 and 12".to_owned(),
        ));
    }

    let sellers = AnalyticsService::new(state.pool())
        .monthly_bestsellers(year, month)
        .await?;
    Ok(ApiResponse::ok(sellers))
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    /// Configurable period length in days (default 30).
    period: Option<i64>,
}

async fn summary(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    user.require(Permission::ViewAnalytics)?;

    let period = query.period.unwrap_or(30);
    if !(1..=365).contains(&period) {
        return Err(AppError::Validation(
            "period must be between 1 and 365".to_owned(),
        ));
    }

    let report = AnalyticsService::new(state.pool()).summary(period).await?;
    Ok(ApiResponse::ok(report))
}
