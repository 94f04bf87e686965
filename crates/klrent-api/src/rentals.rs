// Rental history and vehicle document endpoints (authenticated)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::Locacao;

impl ApiClient {
    /// `GET /locacao`
    pub async fn list_rentals(&self) -> Result<Vec<Locacao>, Error> {
        debug!("listing rentals");
        self.get(
            "/locacao",
            &(),
            Access::Authenticated,
            "Could not load rental history",
        )
        .await
    }

    /// Link to the documents folder of a rented vehicle.
    ///
    /// `GET /folders/link-carro?idCarro={id}`
    pub async fn vehicle_document_link(&self, car_id: u64) -> Result<String, Error> {
        debug!(car_id, "fetching vehicle document link");
        self.get_text(
            "/folders/link-carro",
            &[("idCarro", car_id)],
            Access::Authenticated,
            "Could not fetch the vehicle documents",
        )
        .await
    }
}
