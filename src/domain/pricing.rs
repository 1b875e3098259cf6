//! Product pricing records and calculation payloads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;

/// Rental period a rate applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalPeriod {
    Hour,
    Day,
    Week,
    Month,
}

impl RentalPeriod {
    pub const ALL: [RentalPeriod; 4] = [Self::Hour, Self::Day, Self::Week, Self::Month];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hour => "Hourly",
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
        }
    }

    /// Number of days a week or month rate stands for.
    pub fn days(&self) -> Option<u32> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Hour | Self::Day => None,
        }
    }
}

/// Per-country price list of a product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPrice {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub product_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub country_id: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_hour: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_day: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_week: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub price_per_month: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub weekly_discount_percentage: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub monthly_discount_percentage: Option<Decimal>,

    #[serde(default)]
    pub is_active: Option<bool>,

    #[serde(default)]
    pub effective_from: Option<String>,

    #[serde(default)]
    pub effective_until: Option<String>,
}

impl ProductPrice {
    /// Explicit rate stored for a period, if any.
    pub fn explicit_rate(&self, period: RentalPeriod) -> Option<Decimal> {
        match period {
            RentalPeriod::Hour => self.price_per_hour,
            RentalPeriod::Day => self.price_per_day,
            RentalPeriod::Week => self.price_per_week,
            RentalPeriod::Month => self.price_per_month,
        }
    }

    /// Explicit discount percentage for a long period, if any.
    pub fn explicit_discount(&self, period: RentalPeriod) -> Option<Decimal> {
        match period {
            RentalPeriod::Week => self.weekly_discount_percentage,
            RentalPeriod::Month => self.monthly_discount_percentage,
            RentalPeriod::Hour | RentalPeriod::Day => None,
        }
    }
}

/// Body of a price calculation request, passed through to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCalculationRequest {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
    pub rental_start_date: String,
    pub rental_end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Backend answer to a price calculation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceCalculation {
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub base_price: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub discount_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub platform_fee: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub tax_amount: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_price: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient::count")]
    pub rental_duration_days: Option<u64>,

    /// Rate tier the backend picked, e.g. "daily" or "weekly"
    #[serde(default)]
    pub rate_type: Option<String>,
}

/// Body of a cross-country price comparison request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceComparisonRequest {
    pub product_id: String,
    pub rental_start_date: String,
    pub rental_end_date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_ids: Vec<String>,
}

/// One country's row in a price comparison.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceComparisonEntry {
    #[serde(default, deserialize_with = "lenient::opt_id")]
    pub country_id: Option<String>,

    #[serde(default)]
    pub country_name: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_price: Option<Decimal>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<Decimal>,
}
