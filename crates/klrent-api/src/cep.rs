// Postal-code (CEP) address lookups against ViaCEP.
//
// Used to pre-fill the address part of the registration form. The service
// answers `{"erro": true}` with HTTP 200 for well-formed but unknown codes.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::client::decode;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Public ViaCEP endpoint.
pub const VIACEP_URL: &str = "https://viacep.com.br";

/// Address fields returned for a CEP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endereco {
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
    /// `true` (or `"true"` on newer deployments) for unknown codes.
    #[serde(default, skip_serializing)]
    erro: Option<serde_json::Value>,
}

impl Endereco {
    /// Whether the service reported the code as unknown.
    pub fn is_unknown(&self) -> bool {
        match &self.erro {
            None | Some(serde_json::Value::Null | serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => s != "false",
            Some(_) => true,
        }
    }
}

/// HTTP client for the CEP lookup service.
pub struct CepClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CepClient {
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Look up the address for `cep` (mask allowed).
    ///
    /// Codes without exactly eight digits are not sent; they and unknown
    /// codes yield `None`.
    pub async fn lookup(&self, cep: &str) -> Result<Option<Endereco>, Error> {
        let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 8 {
            return Ok(None);
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let url = Url::parse(&format!("{base}/ws/{digits}/json/"))?;
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("Could not look up CEP {digits}"),
            });
        }

        let address: Endereco = decode(&resp.text().await?)?;
        Ok((!address.is_unknown()).then_some(address))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_variants() {
        let found: Endereco = serde_json::from_str(r#"{"cep":"69005-010","uf":"AM"}"#).unwrap();
        assert!(!found.is_unknown());

        for body in [r#"{"erro":true}"#, r#"{"erro":"true"}"#] {
            let missing: Endereco = serde_json::from_str(body).unwrap();
            assert!(missing.is_unknown(), "{body}");
        }
    }
}
