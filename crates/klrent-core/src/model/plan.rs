use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A promotional plan: a flat total price for a minimum number of days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoPlan {
    pub id: u64,
    pub title: String,
    pub minimum_stay_days: u32,
    /// Total price for exactly `minimum_stay_days` days with basic insurance.
    pub target_price: Decimal,
    pub note: Option<String>,
    pub group_id: u64,
    pub state_id: u64,
}
