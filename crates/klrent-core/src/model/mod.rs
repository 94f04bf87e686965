// ── Domain model ──
//
// Canonical types consumed by the pricing engine, the reservation draft,
// and the CLI. Wire types from `klrent_api` are converted in `convert`.

pub mod common;
pub mod plan;
pub mod rental;
pub mod reservation;
pub mod store;
pub mod user;
pub mod vehicle;

pub use common::{InsuranceTier, RentalMode};
pub use plan::PromoPlan;
pub use rental::Rental;
pub use reservation::{Cancellation, Reservation, ReservationStatus};
pub use store::Store;
pub use user::{CustomerRecord, UserProfile};
pub use vehicle::VehicleOffer;
