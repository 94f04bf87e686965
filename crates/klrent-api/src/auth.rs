// Authentication endpoints
//
// Login and registration hand back a bearer token; `/auth/me` validates
// the current one and may return a renewed token. The caller decides
// whether to install it with `ApiClient::set_token`.

use tracing::debug;

use crate::client::{Access, ApiClient};
use crate::error::Error;
use crate::models::{AuthResponse, ForgotPasswordRequest, LoginRequest, RegisterRequest};

impl ApiClient {
    /// Exchange credentials for a token.
    ///
    /// `POST /auth/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        debug!(email, "logging in");
        let body = LoginRequest {
            email: email.to_owned(),
            senha: password.to_owned(),
        };
        self.post("/auth/login", &body, Access::Public, "Login failed")
            .await
    }

    /// Create a portal account.
    ///
    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, Error> {
        debug!(email = %request.email, "registering account");
        self.post("/auth/register", request, Access::Public, "Registration failed")
            .await
    }

    /// Ask the backend to send a password-reset e-mail.
    ///
    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<AuthResponse, Error> {
        debug!(email, "requesting password reset");
        let body = ForgotPasswordRequest {
            email: email.to_owned(),
        };
        self.post(
            "/auth/forgot-password",
            &body,
            Access::Public,
            "Could not request a password reset",
        )
        .await
    }

    /// Validate the current token, possibly receiving a renewed one.
    ///
    /// `GET /auth/me`
    pub async fn me(&self) -> Result<AuthResponse, Error> {
        debug!("checking session");
        self.get("/auth/me", &(), Access::Authenticated, "Could not verify the session")
            .await
    }
}
