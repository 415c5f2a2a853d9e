//! Session manager: the single object mediating between UI intents and the
//! backend.
//!
//! Owns no state of its own; everything it knows is read from and written
//! through the credential store and the API client. Backend error messages
//! are surfaced verbatim; transport failures are mapped to a fixed fallback
//! message per operation and never retried.

use anyhow::Result;
use serde_json::json;
use shopctl_types::{ApiEnvelope, AuthData, TokenData, User, UserUpdate};

use crate::api::{ApiClient, ApiError};
use crate::config::Config;

use super::store::CredentialStore;

const FALLBACK_LOGIN: &str = "Login failed";
const FALLBACK_REGISTER: &str = "Registration failed";
const FALLBACK_FORGOT: &str = "Could not send reset email";
const FALLBACK_RESET: &str = "Password reset failed";
const FALLBACK_REFRESH: &str = "Session refresh failed";
const FALLBACK_PROFILE: &str = "Could not load profile";
const FALLBACK_UPDATE: &str = "Profile update failed";

/// Mediates login, registration, logout, and profile operations.
#[derive(Debug, Clone)]
pub struct SessionManager {
    client: ApiClient,
    store: CredentialStore,
}

impl SessionManager {
    /// Creates a manager from configuration and a credential store.
    pub fn new(config: &Config, store: CredentialStore) -> Result<Self> {
        let client = ApiClient::new(&config.api, store.clone())?;
        Ok(Self { client, store })
    }

    /// Returns the underlying credential store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Authenticates with email and password.
    ///
    /// On success the access token, refresh token, and user snapshot are
    /// persisted in that order before the payload is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData> {
        let body = json!({ "email": email, "password": password });
        let auth = self.auth_call("/auth/login", &body, FALLBACK_LOGIN).await?;
        self.persist_auth(&auth)?;
        Ok(auth)
    }

    /// Registers a new account.
    ///
    /// The outbound body always carries `role: "admin"` regardless of caller
    /// input; this client only provisions admin accounts.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<AuthData> {
        let mut body = json!({
            "name": name,
            "email": email,
            "password": password,
            "role": "admin",
        });
        if let Some(phone) = phone {
            body["phone"] = json!(phone);
        }

        let auth = self.auth_call("/auth/register", &body, FALLBACK_REGISTER).await?;
        self.persist_auth(&auth)?;
        Ok(auth)
    }

    /// Ends the session.
    ///
    /// The backend notification is best-effort: a failure is logged and
    /// swallowed so the local purge always completes.
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.client.post("/auth/logout", &json!({})).await {
            tracing::warn!("logout notification failed, purging locally anyway: {e}");
        }
        self.store.clear_all()
    }

    /// Requests a password-reset email. Returns the backend acknowledgment.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        let body = json!({ "email": email });
        self.ack_call("/auth/forgot-password", &body, FALLBACK_FORGOT)
            .await
    }

    /// Completes a password reset. Returns the backend acknowledgment.
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String> {
        let body = json!({ "token": token, "password": password });
        self.ack_call("/auth/reset-password", &body, FALLBACK_RESET)
            .await
    }

    /// Mints a new access token from the stored refresh token.
    ///
    /// If no refresh token is stored, or the backend rejects it, the entire
    /// local session is purged and a generic failure is raised — no partial
    /// state survives a failed refresh.
    pub async fn refresh_session(&self) -> Result<String> {
        let Some(refresh_token) = self.store.refresh_token() else {
            self.store.clear_all()?;
            anyhow::bail!(FALLBACK_REFRESH);
        };

        let body = json!({ "refreshToken": refresh_token });
        let token = match self.token_call("/auth/refresh", &body).await {
            Ok(token) => token,
            Err(e) => {
                tracing::debug!("refresh rejected, purging session: {e}");
                self.store.clear_all()?;
                anyhow::bail!(FALLBACK_REFRESH);
            }
        };

        self.store.set_access_token(&token)?;
        Ok(token)
    }

    /// Fetches the canonical profile and overwrites the stored user.
    ///
    /// The stored tokens are untouched.
    pub async fn current_user(&self) -> Result<User> {
        let response = self
            .client
            .get("/users/profile")
            .await
            .map_err(|e| e.or_generic(FALLBACK_PROFILE))?;
        let envelope: ApiEnvelope<User> = ApiClient::json(response)
            .await
            .map_err(|e| e.or_generic(FALLBACK_PROFILE))?;

        let user = Self::unwrap_envelope(envelope, FALLBACK_PROFILE)?;
        self.store.set_user(&user)?;
        Ok(user)
    }

    /// Applies a partial profile update and persists the returned user.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User> {
        let body = serde_json::to_value(update)?;
        let response = self
            .client
            .put("/users/profile", &body)
            .await
            .map_err(|e| e.or_generic(FALLBACK_UPDATE))?;
        let envelope: ApiEnvelope<User> = ApiClient::json(response)
            .await
            .map_err(|e| e.or_generic(FALLBACK_UPDATE))?;

        let user = Self::unwrap_envelope(envelope, FALLBACK_UPDATE)?;
        self.store.set_user(&user)?;
        Ok(user)
    }

    /// Persists a successful auth payload: access token, refresh token, then
    /// the user snapshot, in that order.
    fn persist_auth(&self, auth: &AuthData) -> Result<()> {
        self.store.set_access_token(&auth.token)?;
        self.store.set_refresh_token(&auth.refresh_token)?;
        self.store.set_user(&auth.user)?;
        Ok(())
    }

    /// True iff both an access token and a user record are stored.
    ///
    /// The refresh token's absence does not by itself invalidate a session.
    pub fn is_authenticated(&self) -> bool {
        self.store.access_token().is_some() && self.store.user().is_some()
    }

    /// True iff the stored user's role is admin.
    pub fn is_admin(&self) -> bool {
        self.store.user().is_some_and(|u| u.is_admin())
    }

    /// POST expecting a `{user, token, refreshToken}` payload.
    async fn auth_call(
        &self,
        path: &str,
        body: &serde_json::Value,
        fallback: &str,
    ) -> Result<AuthData> {
        let response = self
            .client
            .post(path, body)
            .await
            .map_err(|e| e.or_generic(fallback))?;
        let envelope: ApiEnvelope<AuthData> = ApiClient::json(response)
            .await
            .map_err(|e| e.or_generic(fallback))?;
        let auth = Self::unwrap_envelope(envelope, fallback)?;
        Ok(auth)
    }

    /// POST expecting only a `{success, message}` acknowledgment.
    async fn ack_call(
        &self,
        path: &str,
        body: &serde_json::Value,
        fallback: &str,
    ) -> Result<String> {
        let response = self
            .client
            .post(path, body)
            .await
            .map_err(|e| e.or_generic(fallback))?;
        let envelope: ApiEnvelope<serde_json::Value> = ApiClient::json(response)
            .await
            .map_err(|e| e.or_generic(fallback))?;
        Ok(envelope.message.unwrap_or_else(|| "OK".to_string()))
    }

    /// POST expecting a `{data: {token}}` payload.
    async fn token_call(&self, path: &str, body: &serde_json::Value) -> Result<String> {
        let response = self.client.post(path, body).await?;
        let envelope: ApiEnvelope<TokenData> = ApiClient::json(response).await?;
        let data = Self::unwrap_envelope(envelope, FALLBACK_REFRESH)?;
        Ok(data.token)
    }

    /// Unwraps an envelope's payload, mapping an absent payload to the
    /// envelope's own message (verbatim) or the operation fallback.
    fn unwrap_envelope<T>(envelope: ApiEnvelope<T>, fallback: &str) -> Result<T, ApiError> {
        envelope.into_data().map_err(|msg| match msg {
            Some(msg) => ApiError::backend_message(msg),
            None => ApiError::parse(fallback),
        })
    }
}
