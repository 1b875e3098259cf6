//! Booking records as returned by the marketplace backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// A rental booking. Only the fields the admin views read are mirrored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Booking {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,

    #[serde(default, alias = "bookingNumber")]
    pub booking_number: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, alias = "paymentStatus")]
    pub payment_status: Option<String>,

    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,

    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::decimal")]
    pub total_amount: Option<Decimal>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub pricing: Option<BookingPricing>,

    #[serde(default)]
    pub renter: Option<PartySummary>,

    #[serde(default)]
    pub owner: Option<PartySummary>,

    #[serde(default)]
    pub product: Option<ProductSummary>,

    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Nested pricing block of a booking.
///
/// Older bookings carry camelCase keys, newer ones snake_case, and some carry
/// both. `total_amount` and the legacy `totalAmount` are kept apart because
/// they rank differently when resolving the displayed price; the remaining
/// components take whichever spelling parses first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct BookingPricing {
    pub total_amount: Option<Decimal>,
    pub legacy_total_amount: Option<Decimal>,
    pub subtotal: Option<Decimal>,
    pub platform_fee: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub security_deposit: Option<Decimal>,
    pub currency: Option<String>,
}

impl From<Value> for BookingPricing {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self::from_map(&map)
    }
}

impl BookingPricing {
    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            total_amount: lenient::first_decimal(map, &["total_amount"]),
            legacy_total_amount: lenient::first_decimal(map, &["totalAmount"]),
            subtotal: lenient::first_decimal(map, &["subtotal", "subTotal"]),
            platform_fee: lenient::first_decimal(map, &["platform_fee", "platformFee"]),
            tax_amount: lenient::first_decimal(map, &["tax_amount", "taxAmount"]),
            security_deposit: lenient::first_decimal(
                map,
                &["security_deposit", "securityDeposit"],
            ),
            currency: lenient::first_string(map, &["currency"]),
        }
    }
}

/// Renter or owner as embedded in a booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartySummary {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "fullName")]
    pub full_name: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PartySummary {
    /// Best human-readable name: full name, then first + last, then email.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().map(str::trim) {
            if !full.is_empty() {
                return full.to_string();
            }
        }

        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return joined;
        }

        self.email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
            .to_string()
    }
}

/// Product as embedded in a booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSummary {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
}

/// Filters for the admin booking list, forwarded to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingListQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: Option<String>,
    pub search: Option<String>,
}
