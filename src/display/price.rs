//! Price resolution and formatting.
//!
//! Backend records carry overlapping, partly-legacy amount fields. Each
//! resolver walks its candidates in a fixed order and takes the first usable
//! one: present and strictly positive. A zero total means "not filled in",
//! not "free".

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use crate::domain::{Booking, PriceCalculation, PriceComparisonEntry, ProductPrice, RentalPeriod};

use super::discount::clamp_percentage;

/// Shown wherever no amount can be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// An amount in a currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.trim().to_uppercase(),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.amount, &self.currency))
    }
}

/// `"<amount> <CURRENCY>"` with exactly two decimals, half away from zero.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        rounded.to_string()
    } else {
        format!("{rounded} {currency}")
    }
}

/// Formats an optional amount, or [`NOT_AVAILABLE`].
pub fn format_optional(amount: Option<Decimal>, currency: &str) -> String {
    match amount {
        Some(amount) => format_money(amount, currency),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn usable(amount: Option<Decimal>) -> Option<Decimal> {
    amount.filter(|a| *a > Decimal::ZERO)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Which booking field the displayed amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    BookingTotal,
    PricingTotal,
    LegacyPricingTotal,
    Reconstructed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAmount {
    #[serde(flatten)]
    pub money: Money,
    pub source: AmountSource,
}

/// Currency of a booking: its own, then its pricing block's, then `fallback`.
pub fn booking_currency<'a>(booking: &'a Booking, fallback: &'a str) -> &'a str {
    non_blank(booking.currency.as_deref())
        .or_else(|| {
            booking
                .pricing
                .as_ref()
                .and_then(|p| non_blank(p.currency.as_deref()))
        })
        .unwrap_or(fallback)
}

/// Resolves the amount to display for a booking.
///
/// Order: `total_amount`, `pricing.total_amount`, legacy
/// `pricing.totalAmount`, then `subtotal + platform_fee + tax_amount` where
/// only the subtotal is mandatory.
pub fn resolve_booking_amount(booking: &Booking, fallback_currency: &str) -> Option<ResolvedAmount> {
    let pricing = booking.pricing.as_ref();

    let candidates = [
        (booking.total_amount, AmountSource::BookingTotal),
        (pricing.and_then(|p| p.total_amount), AmountSource::PricingTotal),
        (
            pricing.and_then(|p| p.legacy_total_amount),
            AmountSource::LegacyPricingTotal,
        ),
        (
            pricing.and_then(|p| {
                p.subtotal?
                    .checked_add(p.platform_fee.unwrap_or_default())?
                    .checked_add(p.tax_amount.unwrap_or_default())
            }),
            AmountSource::Reconstructed,
        ),
    ];

    let (amount, source) = candidates
        .into_iter()
        .find_map(|(amount, source)| usable(amount).map(|a| (a, source)))?;

    Some(ResolvedAmount {
        money: Money::new(amount, booking_currency(booking, fallback_currency)),
        source,
    })
}

/// Display string for a booking's amount, or `"N/A"`.
pub fn display_booking_amount(booking: &Booking, fallback_currency: &str) -> String {
    resolve_booking_amount(booking, fallback_currency)
        .map(|resolved| resolved.money.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// A rate for one rental period, either stored or derived from a shorter one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    pub period: RentalPeriod,
    pub amount: Decimal,
    pub derived: bool,
}

/// Rate for `period`.
///
/// A stored positive rate wins. Otherwise: day = hour x 24, week = day x 7
/// less the weekly discount, month = day x 30 less the monthly discount.
/// Hourly rates are never derived. A derivation that overflows yields `None`.
pub fn resolve_rate(price: &ProductPrice, period: RentalPeriod) -> Option<ResolvedRate> {
    if let Some(amount) = usable(price.explicit_rate(period)) {
        return Some(ResolvedRate {
            period,
            amount,
            derived: false,
        });
    }

    let amount = match period {
        RentalPeriod::Hour => return None,
        RentalPeriod::Day => usable(price.price_per_hour)?.checked_mul(Decimal::from(24))?,
        RentalPeriod::Week | RentalPeriod::Month => {
            let days = Decimal::from(period.days()?);
            let daily = resolve_rate(price, RentalPeriod::Day)?.amount;
            let discount = clamp_percentage(price.explicit_discount(period).unwrap_or_default());
            daily
                .checked_mul(days)?
                .checked_mul(Decimal::ONE_HUNDRED - discount)?
                / Decimal::ONE_HUNDRED
        }
    };

    usable(Some(amount)).map(|amount| ResolvedRate {
        period,
        amount: amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        derived: true,
    })
}

/// Total of a backend price calculation: `total_price`, `total_amount`, then
/// `base_price - discount_amount + platform_fee + tax_amount`.
pub fn resolve_calculation_total(calculation: &PriceCalculation) -> Option<Decimal> {
    usable(calculation.total_price)
        .or_else(|| usable(calculation.total_amount))
        .or_else(|| {
            let total = calculation
                .base_price?
                .checked_sub(calculation.discount_amount.unwrap_or_default())?
                .checked_add(calculation.platform_fee.unwrap_or_default())?
                .checked_add(calculation.tax_amount.unwrap_or_default())?;
            usable(Some(total))
        })
}

/// Total of a comparison row: `total_price`, then `total_amount`.
pub fn resolve_comparison_total(entry: &PriceComparisonEntry) -> Option<Decimal> {
    usable(entry.total_price).or_else(|| usable(entry.total_amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookingPricing;
    use crate::test_support::dec;
    use rstest::rstest;

    fn booking_with(total: Option<&str>, pricing: Option<BookingPricing>) -> Booking {
        Booking {
            id: "b-1".into(),
            total_amount: total.map(dec),
            currency: Some("eur".into()),
            pricing,
            ..Default::default()
        }
    }

    #[test]
    fn subtotal_plus_platform_fee_uses_record_currency() {
        let booking = booking_with(
            None,
            Some(BookingPricing {
                subtotal: Some(dec("100")),
                platform_fee: Some(dec("12.5")),
                ..Default::default()
            }),
        );

        let resolved = resolve_booking_amount(&booking, "USD").expect("resolves");
        assert_eq!(resolved.source, AmountSource::Reconstructed);
        assert_eq!(display_booking_amount(&booking, "USD"), "112.50 EUR");
    }

    #[test]
    fn no_usable_field_displays_not_available() {
        let booking = booking_with(
            Some("0"),
            Some(BookingPricing {
                total_amount: Some(dec("0")),
                platform_fee: Some(dec("5")),
                ..Default::default()
            }),
        );
        assert_eq!(display_booking_amount(&booking, "USD"), "N/A");
        assert_eq!(display_booking_amount(&Booking::default(), "USD"), "N/A");
    }

    #[rstest]
    #[case(Some("250"), Some("240"), Some("230"), AmountSource::BookingTotal, "250.00 EUR")]
    #[case(None, Some("240"), Some("230"), AmountSource::PricingTotal, "240.00 EUR")]
    #[case(Some("0"), None, Some("230"), AmountSource::LegacyPricingTotal, "230.00 EUR")]
    #[case(None, Some("-4"), Some("230"), AmountSource::LegacyPricingTotal, "230.00 EUR")]
    fn candidates_follow_precedence(
        #[case] booking_total: Option<&str>,
        #[case] pricing_total: Option<&str>,
        #[case] legacy_total: Option<&str>,
        #[case] source: AmountSource,
        #[case] expected: &str,
    ) {
        let booking = booking_with(
            booking_total,
            Some(BookingPricing {
                total_amount: pricing_total.map(dec),
                legacy_total_amount: legacy_total.map(dec),
                subtotal: Some(dec("1")),
                ..Default::default()
            }),
        );

        let resolved = resolve_booking_amount(&booking, "USD").expect("resolves");
        assert_eq!(resolved.source, source);
        assert_eq!(resolved.money.to_string(), expected);
    }

    #[test]
    fn currency_falls_back_to_pricing_then_default() {
        let mut booking = booking_with(
            Some("10"),
            Some(BookingPricing {
                currency: Some("rwf".into()),
                ..Default::default()
            }),
        );
        booking.currency = Some("  ".into());
        assert_eq!(display_booking_amount(&booking, "USD"), "10.00 RWF");

        booking.pricing = None;
        assert_eq!(display_booking_amount(&booking, "USD"), "10.00 USD");
    }

    #[rstest]
    #[case("12.345", "12.35 USD")]
    #[case("12.344", "12.34 USD")]
    #[case("7", "7.00 USD")]
    #[case("1000000.5", "1000000.50 USD")]
    fn formats_two_decimals(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_money(dec(raw), "usd"), expected);
    }

    fn price() -> ProductPrice {
        ProductPrice {
            id: "pp-1".into(),
            currency: Some("USD".into()),
            price_per_hour: Some(dec("5")),
            weekly_discount_percentage: Some(dec("10")),
            monthly_discount_percentage: Some(dec("150")),
            ..Default::default()
        }
    }

    #[test]
    fn missing_weekly_rate_derives_from_daily_and_discount() {
        let mut price = price();
        price.price_per_day = Some(dec("40"));

        let weekly = resolve_rate(&price, RentalPeriod::Week).expect("weekly rate");
        assert!(weekly.derived);
        assert_eq!(weekly.amount, dec("252.00"));
    }

    #[test]
    fn daily_rate_derives_from_hourly() {
        let daily = resolve_rate(&price(), RentalPeriod::Day).expect("daily rate");
        assert!(daily.derived);
        assert_eq!(daily.amount, dec("120"));
    }

    #[test]
    fn fully_discounted_month_is_unavailable() {
        // 150% clamps to 100%, leaving nothing to charge
        assert_eq!(resolve_rate(&price(), RentalPeriod::Month), None);
    }

    #[test]
    fn stored_rate_wins_and_hour_is_never_derived() {
        let mut price = price();
        price.price_per_week = Some(dec("199"));
        let weekly = resolve_rate(&price, RentalPeriod::Week).expect("weekly rate");
        assert!(!weekly.derived);
        assert_eq!(weekly.amount, dec("199"));

        price.price_per_hour = None;
        assert_eq!(resolve_rate(&price, RentalPeriod::Hour), None);
    }

    #[test]
    fn calculation_total_reconstructs_from_parts() {
        let calculation = PriceCalculation {
            base_price: Some(dec("300")),
            discount_amount: Some(dec("30")),
            platform_fee: Some(dec("15")),
            tax_amount: Some(dec("4.5")),
            ..Default::default()
        };
        assert_eq!(resolve_calculation_total(&calculation), Some(dec("289.5")));

        let explicit = PriceCalculation {
            total_amount: Some(dec("280")),
            ..calculation
        };
        assert_eq!(resolve_calculation_total(&explicit), Some(dec("280")));
    }

    #[test]
    fn overflowing_reconstruction_is_unavailable() {
        let booking = booking_with(
            None,
            Some(BookingPricing {
                subtotal: Some(Decimal::MAX),
                platform_fee: Some(dec("1")),
                ..Default::default()
            }),
        );
        assert_eq!(resolve_booking_amount(&booking, "USD"), None);
        assert_eq!(display_booking_amount(&booking, "USD"), "N/A");
    }

    #[test]
    fn overflowing_rate_derivation_is_unavailable() {
        let mut price = price();
        price.price_per_hour = Some(Decimal::MAX);
        assert_eq!(resolve_rate(&price, RentalPeriod::Day), None);

        price.price_per_hour = None;
        price.price_per_day = Some(Decimal::MAX);
        assert_eq!(resolve_rate(&price, RentalPeriod::Week), None);
        assert!(resolve_rate(&price, RentalPeriod::Day).is_some());
    }

    #[test]
    fn overflowing_calculation_total_is_unavailable() {
        let calculation = PriceCalculation {
            base_price: Some(Decimal::MAX),
            platform_fee: Some(dec("1")),
            ..Default::default()
        };
        assert_eq!(resolve_calculation_total(&calculation), None);

        let underflow = PriceCalculation {
            base_price: Some(Decimal::MIN),
            discount_amount: Some(dec("1")),
            ..Default::default()
        };
        assert_eq!(resolve_calculation_total(&underflow), None);
    }
}
