// ── Common types shared across the domain model ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a reservation is priced.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RentalMode {
    /// Per-day pricing from the vehicle's daily rate.
    #[default]
    Conventional,
    /// Flat price from a promotional plan once its minimum stay is met.
    Promotional,
}

/// Insurance coverage chosen for a reservation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InsuranceTier {
    #[default]
    Basic,
    Premium,
}

impl InsuranceTier {
    /// The backend's name for the tier (`basico` / `premium`).
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Basic => "basico",
            Self::Premium => "premium",
        }
    }
}
