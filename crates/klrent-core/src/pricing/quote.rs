// ── Reservation quote calculator ──
//
// Prices a prospective reservation from the vehicle's daily rate or a
// promotional plan, an insurance tier, and a date range. Pure: the same
// inputs always produce the same quote.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::calendar::billable_days;
use crate::model::{InsuranceTier, PromoPlan, RentalMode, VehicleOffer};

/// Premium coverage markup applied over a promotional plan's target price.
pub const PREMIUM_PLAN_MARKUP: Decimal = Decimal::from_parts(24375, 0, 0, false, 5);

/// Pricing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Fraction added to a plan's target price for premium insurance.
    pub premium_plan_markup: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            premium_plan_markup: PREMIUM_PLAN_MARKUP,
        }
    }
}

/// Price shown for a prospective reservation.
///
/// Values keep full precision; use the `display_*` accessors for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub billable_days: u32,
    pub effective_daily_rate: Decimal,
    pub total_price: Decimal,
}

impl Quote {
    /// The quote for missing inputs. Never submittable.
    pub fn zero() -> Self {
        Self {
            billable_days: 0,
            effective_daily_rate: Decimal::ZERO,
            total_price: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.total_price.is_zero()
    }

    pub fn display_daily_rate(&self) -> Decimal {
        round_money(self.effective_daily_rate)
    }

    pub fn display_total(&self) -> Decimal {
        round_money(self.total_price)
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl PricingPolicy {
    /// Target price with the tier's markup applied. `None` on overflow.
    fn plan_price(&self, plan: &PromoPlan, tier: InsuranceTier) -> Option<Decimal> {
        match tier {
            InsuranceTier::Basic => Some(plan.target_price),
            InsuranceTier::Premium => plan
                .target_price
                .checked_mul(self.premium_plan_markup)?
                .checked_add(plan.target_price),
        }
    }

    /// Compute a quote under this policy. See [`compute_quote`].
    ///
    /// Amounts too large to represent yield [`Quote::zero`].
    pub fn compute(
        &self,
        vehicle: Option<&VehicleOffer>,
        mode: RentalMode,
        plan: Option<&PromoPlan>,
        tier: InsuranceTier,
        pickup: Option<NaiveDate>,
        ret: Option<NaiveDate>,
    ) -> Quote {
        let Some(vehicle) = vehicle else {
            return Quote::zero();
        };
        let days = match (pickup, ret) {
            (Some(pickup), Some(ret)) => billable_days(pickup, ret),
            _ => 0,
        };
        let plan = match mode {
            RentalMode::Promotional => plan,
            RentalMode::Conventional => None,
        };

        self.priced(vehicle, plan, tier, days).unwrap_or_else(|| {
            tracing::warn!(vehicle = vehicle.id, "quote amounts overflowed");
            Quote::zero()
        })
    }

    fn priced(
        &self,
        vehicle: &VehicleOffer,
        plan: Option<&PromoPlan>,
        tier: InsuranceTier,
        days: u32,
    ) -> Option<Quote> {
        let effective_daily_rate = match plan {
            Some(plan) if plan.minimum_stay_days > 0 => self
                .plan_price(plan, tier)?
                .checked_div(Decimal::from(plan.minimum_stay_days))?,
            _ => {
                let base = vehicle.base_daily_rate;
                base.checked_mul(vehicle.insurance_percent(tier))?
                    .checked_div(Decimal::ONE_HUNDRED)?
                    .checked_add(base)?
            }
        };

        let total_price = match plan {
            Some(plan) if days >= plan.minimum_stay_days => self.plan_price(plan, tier)?,
            _ => effective_daily_rate
                .checked_mul(Decimal::from(days))?
                .max(Decimal::ZERO),
        };

        Some(Quote {
            billable_days: days,
            effective_daily_rate,
            total_price,
        })
    }
}

/// Price a reservation with the default [`PricingPolicy`].
///
/// Promotional mode with a plan charges the plan's flat price once the stay
/// reaches the plan minimum, whatever the number of days; below it, or
/// without a plan, the total is the daily rate times the billable days.
/// Missing vehicle data yields [`Quote::zero`].
pub fn compute_quote(
    vehicle: Option<&VehicleOffer>,
    mode: RentalMode,
    plan: Option<&PromoPlan>,
    tier: InsuranceTier,
    pickup: Option<NaiveDate>,
    ret: Option<NaiveDate>,
) -> Quote {
    PricingPolicy::default().compute(vehicle, mode, plan, tier, pickup, ret)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2026, 10, d)
    }

    fn vehicle(rate: &str, basic: Option<&str>, premium: Option<&str>) -> VehicleOffer {
        VehicleOffer {
            id: 4,
            name: "Grupo B".into(),
            description: None,
            base_daily_rate: dec(rate),
            listed_daily_rate: None,
            basic_insurance_percent: basic.map(dec),
            premium_insurance_percent: premium.map(dec),
            state: Some("Amazonas".into()),
            state_id: 13,
            image: None,
        }
    }

    fn plan(min_days: u32, target: &str) -> PromoPlan {
        PromoPlan {
            id: 9,
            title: "Promo".into(),
            minimum_stay_days: min_days,
            target_price: dec(target),
            note: None,
            group_id: 4,
            state_id: 13,
        }
    }

    #[test]
    fn markup_constant_is_exact() {
        assert_eq!(PREMIUM_PLAN_MARKUP, dec("0.24375"));
    }

    #[test]
    fn conventional_basic_applies_insurance_surcharge() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q.billable_days, 3);
        assert_eq!(q.display_daily_rate(), dec("110.00"));
        assert_eq!(q.display_total(), dec("330.00"));
    }

    #[test]
    fn conventional_premium_uses_premium_percent() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Premium,
            date(19),
            date(21),
        );
        assert_eq!(q.display_daily_rate(), dec("125.00"));
        assert_eq!(q.display_total(), dec("250.00"));
    }

    #[test]
    fn missing_insurance_percent_counts_as_zero() {
        let v = vehicle("80", None, None);
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Premium,
            date(19),
            date(20),
        );
        assert_eq!(q.total_price, dec("80"));
    }

    #[test]
    fn promotional_total_is_pinned_past_minimum() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let p = plan(5, "1000.00");
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Basic,
            date(19),
            date(27),
        );
        assert_eq!(q.billable_days, 8);
        assert_eq!(q.display_daily_rate(), dec("200.00"));
        assert_eq!(q.display_total(), dec("1000.00"));
    }

    #[test]
    fn promotional_premium_adds_markup() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let p = plan(7, "2400.00");
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Premium,
            date(19),
            date(26),
        );
        assert_eq!(q.display_total(), dec("2985.00"));
        // 2985 / 7
        assert_eq!(q.display_daily_rate(), dec("426.43"));
    }

    #[test]
    fn promotional_below_minimum_falls_back_to_daily_rate() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let p = plan(5, "1000.00");
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q.billable_days, 3);
        assert_eq!(q.display_total(), dec("600.00"));
        assert_ne!(q.display_total(), dec("1000.00"));
    }

    #[test]
    fn promotional_without_plan_prices_conventionally() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            None,
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q.display_total(), dec("330.00"));
    }

    #[test]
    fn conventional_mode_ignores_selected_plan() {
        let v = vehicle("100.00", Some("10"), Some("25"));
        let p = plan(2, "50.00");
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            Some(&p),
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q.display_total(), dec("330.00"));
    }

    #[test]
    fn zero_minimum_plan_uses_vehicle_rate_but_pins_total() {
        let v = vehicle("100.00", Some("10"), None);
        let p = plan(0, "500.00");
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Basic,
            date(19),
            date(20),
        );
        assert_eq!(q.display_daily_rate(), dec("110.00"));
        assert_eq!(q.display_total(), dec("500.00"));
    }

    #[test]
    fn missing_inputs_yield_zero() {
        let v = vehicle("100.00", Some("10"), None);
        let none = compute_quote(
            None,
            RentalMode::Conventional,
            None,
            InsuranceTier::Basic,
            date(19),
            date(20),
        );
        assert_eq!(none, Quote::zero());
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Basic,
            date(19),
            None,
        );
        assert!(q.is_zero());
        assert_eq!(q.billable_days, 0);
    }

    #[test]
    fn negative_rates_floor_at_zero() {
        let v = vehicle("-10", None, None);
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q.total_price, Decimal::ZERO);
    }

    #[test]
    fn same_inputs_same_quote() {
        let v = vehicle("133.33", Some("12.5"), Some("30"));
        let p = plan(4, "777.77");
        let args = (RentalMode::Promotional, InsuranceTier::Premium, date(20), date(23));
        let a = compute_quote(Some(&v), args.0, Some(&p), args.1, args.2, args.3);
        let b = compute_quote(Some(&v), args.0, Some(&p), args.1, args.2, args.3);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_policy_changes_premium_markup() {
        let p = plan(2, "100");
        let v = vehicle("50", None, None);
        let policy = PricingPolicy {
            premium_plan_markup: dec("0.5"),
        };
        let q = policy.compute(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Premium,
            date(19),
            date(21),
        );
        assert_eq!(q.total_price, dec("150.0"));
    }

    #[test]
    fn oversized_amounts_yield_zero_quote() {
        let v = vehicle("10000000000000000000000000000", Some("10"), None);
        let q = compute_quote(
            Some(&v),
            RentalMode::Conventional,
            None,
            InsuranceTier::Basic,
            date(19),
            date(22),
        );
        assert_eq!(q, Quote::zero());

        let p = plan(7, "70000000000000000000000000000");
        let q = compute_quote(
            Some(&v),
            RentalMode::Promotional,
            Some(&p),
            InsuranceTier::Premium,
            date(19),
            date(26),
        );
        assert_eq!(q, Quote::zero());
    }
}
