use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A past or ongoing rental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    pub id: u64,
    pub started: NaiveDate,
    pub expected_return: Option<NaiveDate>,
    /// `None` while the vehicle is still out.
    pub returned: Option<NaiveDate>,
    pub customer_id: u64,
    pub car_id: u64,
    pub plate: String,
    pub model: String,
    pub category: Option<String>,
    pub brand: Option<String>,
}

impl Rental {
    pub fn is_active(&self) -> bool {
        self.returned.is_none()
    }
}
