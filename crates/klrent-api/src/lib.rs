//! Async HTTP client for the KL Rent a Car portal backend.
//!
//! [`ApiClient`] covers the public catalog (fleet, stores, promotional
//! plans, customer registration) and the authenticated customer area
//! (login, reservations, rental history, vehicle documents). List
//! responses are normalized here; callers always receive plain vectors.

pub mod cep;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod auth;
mod customers;
mod fleet;
mod plans;
mod rentals;
mod reservations;
mod stores;

pub use cep::{CepClient, Endereco, VIACEP_URL};
pub use client::{Access, ApiClient};
pub use error::Error;
pub use models::*;
pub use transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
