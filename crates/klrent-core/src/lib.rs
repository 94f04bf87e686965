// klrent-core: Pricing, date policy, and session services between klrent-api and the CLI.

pub mod config;
pub mod convert;
pub mod draft;
pub mod error;
pub mod fleet;
pub mod format;
pub mod model;
pub mod offer_ref;
pub mod portal;
pub mod pricing;
pub mod registration;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{PortalConfig, TlsVerification};
pub use draft::ReservationDraft;
pub use error::CoreError;
pub use fleet::FleetFilter;
pub use offer_ref::OfferRef;
pub use portal::{OfferDetails, Portal};
pub use registration::{EmailEntry, PersonKind, PhoneEntry, PostalAddress, RegistrationForm};
pub use session::{Session, SessionKeeper, SessionStore};

// Server-side fleet filters, passed through to the API client.
pub use klrent_api::FrotaFilters;

pub use pricing::{DateRange, DateRejection, PricingPolicy, Quote, compute_quote};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Cancellation, CustomerRecord, InsuranceTier, PromoPlan, Rental, RentalMode, Reservation,
    ReservationStatus, Store, UserProfile, VehicleOffer,
};
