// Promotional plan endpoints (public)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{Listing, Plano};

impl ApiClient {
    /// List promotional plans for a vehicle group in a state.
    ///
    /// `GET /planos?grupo_id={grupo_id}&estado_id={estado_id}`
    pub async fn list_plans(&self, grupo_id: u64, estado_id: u64) -> Result<Vec<Plano>, Error> {
        debug!(grupo_id, estado_id, "listing plans");
        let listing: Listing<Plano> = self
            .get(
                "/planos",
                &[("grupo_id", grupo_id), ("estado_id", estado_id)],
                Access::Public,
                "Could not load promotional plans",
            )
            .await?;
        Ok(listing.into_items())
    }
}
