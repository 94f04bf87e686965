// Customer registration endpoint (public)

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{CadastrarClienteRequest, ClienteResponse};

impl ApiClient {
    /// Register a customer record (individual or company).
    ///
    /// `POST /clientes`
    pub async fn create_customer(
        &self,
        request: &CadastrarClienteRequest,
    ) -> Result<ClienteResponse, Error> {
        debug!(tipo = request.tipo_pessoa_cli, "registering customer");
        self.post(
            "/clientes",
            request,
            Access::Public,
            "Could not complete the registration",
        )
        .await
    }
}
