//! Long-rental discount bars for the pricing screens.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::{ProductPrice, RentalPeriod};

use super::price::resolve_rate;

/// Clamps a percentage into `0..=100`.
pub fn clamp_percentage(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountBar {
    pub period: RentalPeriod,
    pub label: &'static str,
    pub percentage: Decimal,
    pub width_percent: Decimal,
    /// True when the discount was inferred from the rates rather than stored
    pub derived: bool,
}

/// Weekly and monthly discount bars; a bar that can't be computed is left out.
pub fn discount_bars(price: &ProductPrice) -> Vec<DiscountBar> {
    [RentalPeriod::Week, RentalPeriod::Month]
        .into_iter()
        .filter_map(|period| discount_bar(price, period))
        .collect()
}

fn discount_bar(price: &ProductPrice, period: RentalPeriod) -> Option<DiscountBar> {
    let (raw, derived) = match price.explicit_discount(period) {
        Some(stored) => (stored, false),
        None => (implied_discount(price, period)?, true),
    };

    let percentage =
        clamp_percentage(raw).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);

    Some(DiscountBar {
        period,
        label: period.label(),
        percentage,
        width_percent: percentage,
        derived,
    })
}

/// `1 - period_rate / (day_rate * days)` as a percentage. Needs a stored
/// period rate; a derived one would just echo the discount back.
fn implied_discount(price: &ProductPrice, period: RentalPeriod) -> Option<Decimal> {
    let days = Decimal::from(period.days()?);
    let period_rate = price.explicit_rate(period).filter(|r| *r > Decimal::ZERO)?;
    let daily = resolve_rate(price, RentalPeriod::Day)?.amount;
    let undiscounted = daily.checked_mul(days)?;
    if undiscounted <= Decimal::ZERO {
        return None;
    }
    Decimal::ONE
        .checked_sub(period_rate.checked_div(undiscounted)?)?
        .checked_mul(Decimal::ONE_HUNDRED)
}
