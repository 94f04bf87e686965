use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::InsuranceTier;

/// Reservation lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReservationStatus {
    #[strum(to_string = "pending", serialize = "pendente")]
    Pending,
    #[strum(to_string = "confirmed", serialize = "confirmada")]
    Confirmed,
    #[strum(to_string = "cancelled", serialize = "cancelada")]
    Cancelled,
    #[strum(to_string = "completed", serialize = "concluida")]
    Completed,
}

impl ReservationStatus {
    /// Only reservations that have not started or ended can be cancelled.
    pub fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub date: String,
    pub reason: String,
}

/// A reservation owned by the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u64,
    pub registered_at: String,
    pub store_id: u64,
    pub store_name: String,
    pub store_city: Option<String>,
    pub pickup_date: NaiveDate,
    pub pickup_time: Option<String>,
    pub return_date: NaiveDate,
    pub return_time: Option<String>,
    pub group_id: u64,
    pub group_name: String,
    /// `None` for conventional rentals.
    pub plan_id: Option<u64>,
    pub insurance: InsuranceTier,
    pub days: u32,
    pub donated_amount: Option<Decimal>,
    pub origin: Option<String>,
    pub status: ReservationStatus,
    pub cancellation: Option<Cancellation>,
}
