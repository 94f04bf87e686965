// Fleet catalog endpoints (public)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{FrotaFilters, Listing, Veiculo};

const FLEET_FALLBACK: &str = "Could not load the fleet";

impl ApiClient {
    /// List vehicle groups, optionally filtered server-side.
    ///
    /// `GET /frota?categoria=&marca=&...`
    pub async fn list_vehicles(&self, filters: &FrotaFilters) -> Result<Vec<Veiculo>, Error> {
        debug!(?filters, "listing fleet");
        let listing: Listing<Veiculo> = self
            .get("/frota", filters, Access::Public, FLEET_FALLBACK)
            .await?;
        Ok(listing.into_items())
    }

    /// Fetch one vehicle group as offered in a given state.
    ///
    /// `GET /frota/{id}?estado={estado_id}`
    pub async fn get_vehicle(&self, id: u64, estado_id: u64) -> Result<Veiculo, Error> {
        debug!(id, estado_id, "fetching vehicle");
        self.get(
            &format!("/frota/{id}"),
            &[("estado", estado_id)],
            Access::Public,
            FLEET_FALLBACK,
        )
        .await
    }

    /// `GET /frota/categorias`
    pub async fn list_categories(&self) -> Result<Vec<String>, Error> {
        debug!("listing fleet categories");
        self.get("/frota/categorias", &(), Access::Public, FLEET_FALLBACK)
            .await
    }

    /// `GET /frota/marcas`
    pub async fn list_brands(&self) -> Result<Vec<String>, Error> {
        debug!("listing fleet brands");
        self.get("/frota/marcas", &(), Access::Public, FLEET_FALLBACK)
            .await
    }
}
