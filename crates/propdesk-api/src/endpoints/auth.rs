// Auth endpoints
//
// Login-flow calls run in exempt mode: a 401 here is a credential error,
// not an expired session, so the stored token is left untouched.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{ApiClient, AuthMode, decode_one};
use crate::error::Error;
use crate::models::{AuthResponse, AuthUser, FirstUserStatus, Registration};

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// `POST /login` with `{"username": "...", "password": "..."}`
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        debug!(username, "logging in");
        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });
        let text = self
            .execute(Method::POST, "login", &[], Some(&body), AuthMode::Exempt)
            .await?;
        decode_one(&text, "auth")
    }

    /// Create an account.
    ///
    /// `POST /register`
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, Error> {
        debug!(username = %registration.username, "registering");
        let body = serde_json::to_value(registration).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: String::new(),
        })?;
        let text = self
            .execute(Method::POST, "register", &[], Some(&body), AuthMode::Exempt)
            .await?;
        decode_one(&text, "auth")
    }

    /// Check the stored token and return the user it belongs to.
    ///
    /// `GET /verify-token`
    pub async fn verify_token(&self) -> Result<AuthUser, Error> {
        debug!("verifying token");
        self.get_one("verify-token", &[], "user").await
    }

    /// Whether the server has no users yet (first registration becomes admin).
    ///
    /// `GET /check-first-user`
    pub async fn check_first_user(&self) -> Result<FirstUserStatus, Error> {
        debug!("checking first-user status");
        let text = self
            .execute(Method::GET, "check-first-user", &[], None, AuthMode::Exempt)
            .await?;
        decode_one(&text, "status")
    }
}
