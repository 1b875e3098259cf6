//! Pricing routes
//!
//! Product price lists with resolved rates, plus formatted backend price
//! calculations and cross-country comparisons.

use axum::extract::{Path, State};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::api::extract::ApiJson;
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireToken;
use crate::display::date_range::{parse_day, DateRange};
use crate::display::discount::{discount_bars, DiscountBar};
use crate::display::price::{
    format_money, format_optional, resolve_calculation_total, resolve_comparison_total,
    resolve_rate, NOT_AVAILABLE,
};
use crate::domain::{
    PriceCalculationRequest, PriceComparisonRequest, ProductPrice, RentalPeriod,
};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Serialize)]
pub struct RateView {
    pub period: RentalPeriod,
    pub label: &'static str,
    pub amount: Option<Decimal>,
    pub display: String,
    /// Computed from a shorter period's rate rather than stored
    pub derived: bool,
}

#[derive(Debug, Serialize)]
pub struct ProductPriceView {
    pub id: String,
    pub product_id: Option<String>,
    pub country_id: Option<String>,
    pub currency: String,
    pub is_active: bool,
    pub effective_from: Option<String>,
    pub effective_until: Option<String>,
    pub rates: Vec<RateView>,
    pub discounts: Vec<DiscountBar>,
}

impl ProductPriceView {
    fn from_price(price: &ProductPrice, fallback_currency: &str) -> Self {
        let currency = price
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(fallback_currency)
            .to_uppercase();

        let rates = RentalPeriod::ALL
            .into_iter()
            .map(|period| match resolve_rate(price, period) {
                Some(rate) => RateView {
                    period,
                    label: period.label(),
                    amount: Some(rate.amount),
                    display: format_money(rate.amount, &currency),
                    derived: rate.derived,
                },
                None => RateView {
                    period,
                    label: period.label(),
                    amount: None,
                    display: NOT_AVAILABLE.to_string(),
                    derived: false,
                },
            })
            .collect();

        Self {
            id: price.id.clone(),
            product_id: price.product_id.clone(),
            country_id: price.country_id.clone(),
            is_active: price.is_active.unwrap_or(true),
            effective_from: price.effective_from.clone(),
            effective_until: price.effective_until.clone(),
            rates,
            discounts: discount_bars(price),
            currency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculationView {
    pub currency: String,
    pub rental_duration_days: Option<u64>,
    pub rate_type: Option<String>,
    pub base_price: String,
    pub discount_amount: String,
    pub platform_fee: String,
    pub tax_amount: String,
    pub total: String,
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct ComparisonRow {
    pub country_id: Option<String>,
    pub country_name: String,
    pub currency: String,
    pub total: String,
    pub total_amount: Option<Decimal>,
}

/// Rental dates must parse and be in order before the backend sees them.
fn validate_rental_dates(start: &str, end: &str) -> Result<DateRange, ApiError> {
    let start_day = parse_day(start)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid rental start date '{start}'")))?;
    let end_day = parse_day(end)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid rental end date '{end}'")))?;
    Ok(DateRange::custom(start_day, end_day)?)
}

fn currency_or(currency: Option<&str>, fallback: &str) -> String {
    currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(fallback)
        .to_uppercase()
}

/// List a product's prices per country
pub async fn list_product_prices(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    Path(product_id): Path<String>,
) -> ApiResult<DataResponse<Vec<ProductPriceView>>> {
    let prices = state.backend.list_product_prices(&ctx, &product_id).await?;

    let fallback = state.settings.fallback_currency.as_str();
    let views = prices
        .iter()
        .map(|p| ProductPriceView::from_price(p, fallback))
        .collect();

    Ok(DataResponse::new(views))
}

/// Calculate a rental price through the backend
pub async fn calculate_price(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    ApiJson(req): ApiJson<PriceCalculationRequest>,
) -> ApiResult<DataResponse<CalculationView>> {
    if req.product_id.trim().is_empty() {
        return Err(ApiError::BadRequest("product_id is required".to_string()));
    }
    validate_rental_dates(&req.rental_start_date, &req.rental_end_date)?;

    let calc = state.backend.calculate_price(&ctx, &req).await?;

    let currency = currency_or(calc.currency.as_deref(), &state.settings.fallback_currency);
    let total_amount = resolve_calculation_total(&calc);

    Ok(DataResponse::new(CalculationView {
        rental_duration_days: calc.rental_duration_days,
        rate_type: calc.rate_type.clone(),
        base_price: format_optional(calc.base_price, &currency),
        discount_amount: format_optional(calc.discount_amount, &currency),
        platform_fee: format_optional(calc.platform_fee, &currency),
        tax_amount: format_optional(calc.tax_amount, &currency),
        total: format_optional(total_amount, &currency),
        total_amount,
        currency,
    }))
}

/// Compare a rental's price across countries
pub async fn compare_prices(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    ApiJson(req): ApiJson<PriceComparisonRequest>,
) -> ApiResult<DataResponse<Vec<ComparisonRow>>> {
    if req.product_id.trim().is_empty() {
        return Err(ApiError::BadRequest("product_id is required".to_string()));
    }
    validate_rental_dates(&req.rental_start_date, &req.rental_end_date)?;

    let entries = state.backend.compare_prices(&ctx, &req).await?;

    let fallback = state.settings.fallback_currency.as_str();
    let rows = entries
        .iter()
        .map(|entry| {
            let currency = currency_or(entry.currency.as_deref(), fallback);
            let total_amount = resolve_comparison_total(entry);
            ComparisonRow {
                country_id: entry.country_id.clone(),
                country_name: entry
                    .country_name
                    .clone()
                    .or_else(|| entry.country_id.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                total: format_optional(total_amount, &currency),
                total_amount,
                currency,
            }
        })
        .collect();

    Ok(DataResponse::new(rows))
}
