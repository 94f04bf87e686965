use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::InsuranceTier;

/// A rentable vehicle group as offered in one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleOffer {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub base_daily_rate: Decimal,
    /// Advertised daily price shown in the catalog, when the backend sends one.
    pub listed_daily_rate: Option<Decimal>,
    /// Surcharge over the daily rate, in percent, for basic insurance.
    pub basic_insurance_percent: Option<Decimal>,
    /// Surcharge over the daily rate, in percent, for premium insurance.
    pub premium_insurance_percent: Option<Decimal>,
    pub state: Option<String>,
    pub state_id: u64,
    pub image: Option<String>,
}

impl VehicleOffer {
    /// Insurance surcharge for `tier`, treating a missing percentage as zero.
    pub fn insurance_percent(&self, tier: InsuranceTier) -> Decimal {
        match tier {
            InsuranceTier::Basic => self.basic_insurance_percent,
            InsuranceTier::Premium => self.premium_insurance_percent,
        }
        .unwrap_or(Decimal::ZERO)
    }

    /// The price used for catalog filtering and listing.
    pub fn catalog_rate(&self) -> Decimal {
        self.listed_daily_rate.unwrap_or(self.base_daily_rate)
    }
}
