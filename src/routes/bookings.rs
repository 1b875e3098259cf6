//! Booking routes
//!
//! Read-only booking list and detail views with resolved prices and status
//! badges.

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::extract::ApiQuery;
use crate::api::pagination::{Paginated, PaginationControls, PaginationParams};
use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::auth::RequireToken;
use crate::display::date_range::parse_day;
use crate::display::price::{
    booking_currency, display_booking_amount, format_optional, resolve_booking_amount,
    AmountSource,
};
use crate::display::status::{status_badge, StatusBadge};
use crate::domain::{Booking, BookingListQuery, PartySummary};
use crate::error::ApiResult;

#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl ListBookingsParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }

    fn into_query(self) -> BookingListQuery {
        let pagination = self.pagination();
        BookingListQuery {
            page: pagination.page(),
            per_page: pagination.per_page(),
            // "all" is the UI's no-filter option
            status: filter_value(self.status).filter(|s| !s.eq_ignore_ascii_case("all")),
            search: filter_value(self.search),
        }
    }
}

fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
pub struct PartyView {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: Option<String>,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct RentalPeriodView {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// One line of the bookings table.
#[derive(Debug, Serialize)]
pub struct BookingRow {
    pub id: String,
    pub booking_number: String,
    pub product: ProductView,
    pub renter: PartyView,
    pub owner: PartyView,
    pub period: RentalPeriodView,
    pub amount: String,
    pub amount_source: Option<AmountSource>,
    pub status: StatusBadge,
    pub payment_status: StatusBadge,
    pub created_at: Option<String>,
}

impl BookingRow {
    fn from_booking(booking: &Booking, fallback_currency: &str) -> Self {
        let resolved = resolve_booking_amount(booking, fallback_currency);

        Self {
            id: booking.id.clone(),
            booking_number: booking
                .booking_number
                .clone()
                .unwrap_or_else(|| booking.id.clone()),
            product: ProductView {
                id: booking
                    .product
                    .as_ref()
                    .map(|p| p.id.clone())
                    .filter(|id| !id.is_empty()),
                title: booking
                    .product
                    .as_ref()
                    .and_then(|p| p.title.clone())
                    .unwrap_or_else(|| "Unknown product".to_string()),
            },
            renter: party_view(booking.renter.as_ref()),
            owner: party_view(booking.owner.as_ref()),
            period: RentalPeriodView {
                start: day_string(booking.start_date.as_deref()),
                end: day_string(booking.end_date.as_deref()),
            },
            amount: display_booking_amount(booking, fallback_currency),
            amount_source: resolved.map(|r| r.source),
            status: status_badge(booking.status.as_deref()),
            payment_status: status_badge(booking.payment_status.as_deref()),
            created_at: booking.created_at.clone(),
        }
    }
}

fn party_view(party: Option<&PartySummary>) -> PartyView {
    match party {
        Some(p) => PartyView {
            id: Some(p.id.clone()).filter(|id| !id.is_empty()),
            name: p.display_name(),
        },
        None => PartyView {
            id: None,
            name: "Unknown".to_string(),
        },
    }
}

/// Timestamps are shown as plain days; unparseable values pass through.
fn day_string(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(
        parse_day(raw)
            .map(|d| d.to_string())
            .unwrap_or_else(|| raw.to_string()),
    )
}

/// Price lines of the booking detail panel, each already formatted.
#[derive(Debug, Serialize)]
pub struct PriceBreakdown {
    pub currency: String,
    pub subtotal: String,
    pub platform_fee: String,
    pub tax_amount: String,
    pub security_deposit: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct BookingDetail {
    #[serde(flatten)]
    pub row: BookingRow,
    pub breakdown: PriceBreakdown,
}

/// List bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    ApiQuery(params): ApiQuery<ListBookingsParams>,
) -> ApiResult<Paginated<BookingRow>> {
    let requested = params.pagination();
    let query = params.into_query();

    let page = state.backend.list_bookings(&ctx, &query).await?;

    let fallback = state.settings.fallback_currency.as_str();
    let rows = page
        .items
        .iter()
        .map(|b| BookingRow::from_booking(b, fallback))
        .collect();

    Ok(Paginated::new(
        rows,
        PaginationControls::from_page_info(&page.page_info, &requested),
    ))
}

/// Get a single booking with its price breakdown
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    RequireToken(ctx): RequireToken,
    Path(booking_id): Path<String>,
) -> ApiResult<DataResponse<BookingDetail>> {
    let booking = state.backend.get_booking(&ctx, &booking_id).await?;

    let fallback = state.settings.fallback_currency.as_str();
    let currency = booking_currency(&booking, fallback).to_uppercase();
    let pricing = booking.pricing.clone().unwrap_or_default();

    let breakdown = PriceBreakdown {
        subtotal: format_optional(pricing.subtotal, &currency),
        platform_fee: format_optional(pricing.platform_fee, &currency),
        tax_amount: format_optional(pricing.tax_amount, &currency),
        security_deposit: format_optional(pricing.security_deposit, &currency),
        total: display_booking_amount(&booking, fallback),
        currency,
    };

    Ok(DataResponse::new(BookingDetail {
        row: BookingRow::from_booking(&booking, fallback),
        breakdown,
    }))
}
