// Portal API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer token injection,
// and status/body error mapping. Endpoint groups (fleet, stores, plans,
// reservations, ...) are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Whether a request carries the bearer token.
///
/// Fleet, store, plan, and customer-registration endpoints are public;
/// the web portal sends them through a client without the auth header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

/// Raw HTTP client for the rental portal backend.
///
/// Every method returns the decoded payload or a typed [`Error`]; error
/// bodies are mined for the backend's `message` / `error` text before
/// falling back to a per-resource description.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token for authenticated routes. Set after login and
    /// replaced whenever `/auth/me` hands back a renewed token.
    token: RwLock<Option<SecretString>>,
    /// Request timeout the HTTP client was built with, when known.
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root (e.g. `http://localhost:3000`); paths are
    /// appended to it, so a base with a path prefix (`https://host/api`)
    /// is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            timeout: Some(transport.timeout),
            ..Self::with_client(http, base_url)
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
            timeout: None,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ──────────────────────────────────────────────

    /// Install (or clear) the bearer token used on authenticated routes.
    pub fn set_token(&self, token: Option<SecretString>) {
        debug!(present = token.is_some(), "updating bearer token");
        // The slot holds a plain value, so a poisoned lock is still usable.
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// A copy of the current bearer token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a bearer token is installed.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        access: Access,
    ) -> reqwest::RequestBuilder {
        if access == Access::Public {
            return builder;
        }
        match self.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    // ── URL builder ───────────────────────────────────────────────────

    /// Join an endpoint path onto the base URL: `{base}/{path}`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Report a timed-out request with the configured limit.
    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    // ── Request helpers ───────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        access: Access,
        fallback: &str,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let builder = self.authorize(self.http.get(url).query(query), access);
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let body = self.checked_body(resp, path, fallback).await?;
        decode(&body)
    }

    /// Send a GET request and return the body as text.
    ///
    /// The document-link endpoint answers with either a bare string or a
    /// JSON-encoded string; both collapse to the plain value.
    pub(crate) async fn get_text<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
        access: Access,
        fallback: &str,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let builder = self.authorize(self.http.get(url).query(query), access);
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let body = self.checked_body(resp, path, fallback).await?;

        match serde_json::from_str::<String>(&body) {
            Ok(text) => Ok(text),
            Err(_) => Ok(body.trim().to_owned()),
        }
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        access: Access,
        fallback: &str,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let builder = self.authorize(self.http.post(url).json(body), access);
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        let body = self.checked_body(resp, path, fallback).await?;
        decode(&body)
    }

    /// Send a PATCH request with a JSON body, discarding the response.
    pub(crate) async fn patch(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
        access: Access,
        fallback: &str,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PATCH {}", url);

        let builder = self.authorize(self.http.patch(url).json(body), access);
        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;
        self.checked_body(resp, path, fallback).await?;
        Ok(())
    }

    /// Map non-success statuses to errors and return the body text.
    ///
    /// A 401 on an `/auth/` route means the credentials were rejected;
    /// anywhere else it means the token is no longer valid.
    async fn checked_body(
        &self,
        resp: reqwest::Response,
        path: &str,
        fallback: &str,
    ) -> Result<String, Error> {
        let status = resp.status();
        trace!(%status, path, "response received");

        if status.is_success() {
            return resp.text().await.map_err(|e| self.transport_error(e));
        }

        let body = resp.text().await.unwrap_or_default();
        let message = backend_message(&body).unwrap_or_else(|| fallback.to_owned());

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(if is_auth_route(path) {
                Error::Authentication { message }
            } else {
                Error::SessionExpired
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: path.trim_start_matches('/').to_owned(),
            });
        }

        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }
}

fn is_auth_route(path: &str) -> bool {
    path.trim_start_matches('/').starts_with("auth/")
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message` first, then `error`. Validation layers sometimes send
/// `message` as an array of strings; those are joined.
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| match value.get(key)? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_keeps_base_path_prefix() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://portal.example/api/").unwrap(),
        );
        let url = client.url("/frota/7").unwrap();
        assert_eq!(url.as_str(), "https://portal.example/api/frota/7");
    }

    #[test]
    fn backend_message_prefers_message_field() {
        let body = r#"{"message":"CPF já cadastrado","error":"Bad Request"}"#;
        assert_eq!(backend_message(body).as_deref(), Some("CPF já cadastrado"));
    }

    #[test]
    fn backend_message_joins_arrays() {
        let body = r#"{"message":["email inválido","senha curta"]}"#;
        assert_eq!(
            backend_message(body).as_deref(),
            Some("email inválido; senha curta")
        );
    }

    #[test]
    fn backend_message_falls_back_to_error_field() {
        let body = r#"{"error":"Loja não encontrada"}"#;
        assert_eq!(backend_message(body).as_deref(), Some("Loja não encontrada"));
        assert_eq!(backend_message("<html>oops</html>"), None);
    }

    #[test]
    fn token_slot_survives_a_poisoned_lock() {
        let client = std::sync::Arc::new(ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("https://portal.example/").unwrap(),
        ));
        let held = std::sync::Arc::clone(&client);
        let _ = std::thread::spawn(move || {
            let _guard = held.token.write().unwrap();
            panic!("writer died holding the token lock");
        })
        .join();
        assert!(client.token.is_poisoned());

        client.set_token(Some(SecretString::from("abc")));
        assert!(client.has_token());
        client.set_token(None);
        assert!(!client.has_token());
    }

    #[test]
    fn auth_routes_are_detected() {
        assert!(is_auth_route("/auth/login"));
        assert!(is_auth_route("auth/me"));
        assert!(!is_auth_route("/reserva/minhas"));
    }
}
