// ── Pricing ──
//
// The date-range policy and the quote calculator. Both are pure and
// operate on already-loaded domain values.

pub mod calendar;
pub mod quote;

pub use calendar::{
    DateRange, DateRejection, billable_days, derive_return_date, initialize_default_range,
    next_business_day, reconcile_return_date, validate_pickup_change, validate_return_change,
};
pub use quote::{PREMIUM_PLAN_MARKUP, PricingPolicy, Quote, compute_quote};
