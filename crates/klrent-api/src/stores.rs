// Store endpoints (public)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{Listing, Loja};

impl ApiClient {
    /// List the pickup stores serving a state.
    ///
    /// `GET /loja?id_grupo_loc={estado_id}`
    pub async fn list_stores(&self, estado_id: u64) -> Result<Vec<Loja>, Error> {
        debug!(estado_id, "listing stores");
        let listing: Listing<Loja> = self
            .get(
                "/loja",
                &[("id_grupo_loc", estado_id)],
                Access::Public,
                "Could not load stores",
            )
            .await?;
        Ok(listing.into_items())
    }
}
