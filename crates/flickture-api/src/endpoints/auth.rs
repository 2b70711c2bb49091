use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{AuthResponse, LoginRequest, RegisterRequest, Settings, User};

/// Session flows: everything that reads or writes the stored token besides
/// the request pipeline itself.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Log in and store the returned token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let resp: AuthResponse = self
            .client
            .post("/auth/login", &LoginRequest { username, password })
            .await?;
        self.client.credentials().set_token(&resp.token)?;
        tracing::info!(username, "Logged in");
        Ok(resp)
    }

    /// Create an account and store the returned token.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp: AuthResponse = self.client.post("/auth/register", request).await?;
        self.client.credentials().set_token(&resp.token)?;
        tracing::info!(username = %request.username, "Registered");
        Ok(resp)
    }

    /// Forget the stored token. The server keeps no session to end.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.credentials().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/auth/me").await
    }

    pub async fn update_me<P: Serialize + ?Sized>(&self, patch: &P) -> Result<User, ApiError> {
        self.client.patch("/auth/me", patch).await
    }

    /// Validate the stored token against the server.
    ///
    /// `Ok(None)` when no token is stored or the check failed for any
    /// reason; a failed check drops the token so the user signs in again.
    pub async fn check_auth(&self) -> Result<Option<User>, ApiError> {
        if self.client.credentials().token().is_none() {
            return Ok(None);
        }
        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(error = %err, "Session check failed, dropping stored token");
                self.client.credentials().clear()?;
                Ok(None)
            }
        }
    }

    pub async fn settings(&self) -> Result<Settings, ApiError> {
        self.client.get("/auth/settings/").await
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings, ApiError> {
        self.client.patch("/auth/settings/", settings).await
    }
}
