// ── Date-range policy ──
//
// Pickup and return dates for a reservation. The business is closed on
// Sundays, so neither end of a range may fall on one, and a range always
// spans at least one day.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{PromoPlan, RentalMode};

/// Why a date selection was refused. The previous value stays in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRejection {
    #[error("The store is closed on Sundays; pick another date")]
    SundayNotAllowed,
    #[error("The return date cannot be the same as the pickup date")]
    EqualsPickup,
    #[error("The return date must be after the pickup date")]
    ReturnBeforePickup,
}

impl DateRejection {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::SundayNotAllowed => "sunday_not_allowed",
            Self::EqualsPickup => "equals_pickup",
            Self::ReturnBeforePickup => "return_before_pickup",
        }
    }
}

fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Shift a Sunday to the following Monday; other days pass through.
///
/// Only a single one-day shift is applied.
pub fn next_business_day(date: NaiveDate) -> NaiveDate {
    if date.weekday() == Weekday::Sun {
        add_days(date, 1)
    } else {
        date
    }
}

/// Default `(pickup, return)` for a reservation started on `today`.
pub fn initialize_default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let pickup = next_business_day(add_days(today, 1));
    let ret = next_business_day(add_days(pickup, 1));
    (pickup, ret)
}

/// The return date implied by `pickup` under the given mode and plan.
///
/// Promotional mode with a plan lands on `pickup + minimum_stay_days`;
/// everything else on the next day.
pub fn derive_return_date(
    pickup: NaiveDate,
    mode: RentalMode,
    plan: Option<&PromoPlan>,
) -> NaiveDate {
    let span = match (mode, plan) {
        (RentalMode::Promotional, Some(plan)) => plan.minimum_stay_days,
        _ => 1,
    };
    next_business_day(add_days(pickup, span))
}

/// Apply [`derive_return_date`] to an existing selection.
///
/// Promotional mode always takes the derived date. Conventional mode keeps
/// `current` when it is already after `pickup`, so a manually chosen later
/// return survives unrelated changes.
pub fn reconcile_return_date(
    current: Option<NaiveDate>,
    pickup: NaiveDate,
    mode: RentalMode,
    plan: Option<&PromoPlan>,
) -> NaiveDate {
    let derived = derive_return_date(pickup, mode, plan);
    match (mode, current) {
        (RentalMode::Conventional, Some(current)) if current > pickup => current,
        _ => derived,
    }
}

pub fn validate_pickup_change(new: NaiveDate) -> Result<(), DateRejection> {
    if new.weekday() == Weekday::Sun {
        return Err(DateRejection::SundayNotAllowed);
    }
    Ok(())
}

pub fn validate_return_change(new: NaiveDate, pickup: NaiveDate) -> Result<(), DateRejection> {
    if new == pickup {
        return Err(DateRejection::EqualsPickup);
    }
    if new.weekday() == Weekday::Sun {
        return Err(DateRejection::SundayNotAllowed);
    }
    Ok(())
}

/// Whole days between the two dates, in either order.
pub fn billable_days(pickup: NaiveDate, ret: NaiveDate) -> u32 {
    let days = (ret - pickup).num_days().unsigned_abs();
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// A validated pickup/return pair: no Sundays, return strictly after pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pickup: NaiveDate,
    #[serde(rename = "return")]
    ret: NaiveDate,
}

impl DateRange {
    pub fn new(pickup: NaiveDate, ret: NaiveDate) -> Result<Self, DateRejection> {
        validate_pickup_change(pickup)?;
        validate_return_change(ret, pickup)?;
        if ret < pickup {
            return Err(DateRejection::ReturnBeforePickup);
        }
        Ok(Self { pickup, ret })
    }

    pub fn pickup(&self) -> NaiveDate {
        self.pickup
    }

    pub fn return_date(&self) -> NaiveDate {
        self.ret
    }

    pub fn billable_days(&self) -> u32 {
        billable_days(self.pickup, self.ret)
    }
}
