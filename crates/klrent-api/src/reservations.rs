// Reservation endpoints (authenticated)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{CancelarReservaRequest, CriarReservaRequest, ReservaResponse};

const RESERVATION_FALLBACK: &str = "Reservation request failed";

impl ApiClient {
    /// `POST /reserva`
    pub async fn create_reservation(
        &self,
        request: &CriarReservaRequest,
    ) -> Result<ReservaResponse, Error> {
        debug!(
            grupo = request.grupo_escolhido,
            plano = request.plano_escolhido,
            dias = request.qtd_dias,
            "creating reservation"
        );
        self.post(
            "/reserva",
            request,
            Access::Authenticated,
            RESERVATION_FALLBACK,
        )
        .await
    }

    /// Every reservation visible to the account.
    ///
    /// `GET /reserva`
    pub async fn list_reservations(&self) -> Result<Vec<ReservaResponse>, Error> {
        debug!("listing reservations");
        self.get("/reserva", &(), Access::Authenticated, RESERVATION_FALLBACK)
            .await
    }

    /// Reservations owned by the logged-in customer.
    ///
    /// `GET /reserva/minhas`
    pub async fn my_reservations(&self) -> Result<Vec<ReservaResponse>, Error> {
        debug!("listing own reservations");
        self.get(
            "/reserva/minhas",
            &(),
            Access::Authenticated,
            RESERVATION_FALLBACK,
        )
        .await
    }

    /// `GET /reserva/{id}`
    pub async fn get_reservation(&self, id: u64) -> Result<ReservaResponse, Error> {
        debug!(id, "fetching reservation");
        self.get(
            &format!("/reserva/{id}"),
            &(),
            Access::Authenticated,
            RESERVATION_FALLBACK,
        )
        .await
    }

    /// `PATCH /reserva/{id}/cancelar` with `{"motivo": "..."}`
    pub async fn cancel_reservation(&self, id: u64, motivo: &str) -> Result<(), Error> {
        debug!(id, "cancelling reservation");
        let body = CancelarReservaRequest {
            motivo: motivo.to_owned(),
        };
        self.patch(
            &format!("/reserva/{id}/cancelar"),
            &body,
            Access::Authenticated,
            "Could not cancel the reservation",
        )
        .await
    }
}
