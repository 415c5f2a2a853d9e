//! REST response envelopes used by the admin backend.
//!
//! Every endpoint wraps its payload as `{success, message, data}`. The
//! `data` shape varies per endpoint; callers pick the right type parameter.

use serde::Deserialize;

use crate::user::User;

/// Generic `{success, message, data}` wrapper.
///
/// The explicit bound keeps serde from requiring `T: Default` for the
/// defaulted `data` field; payload types are not `Default`.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, or the envelope's own message as the error.
    pub fn into_data(self) -> Result<T, Option<String>> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(self.message),
        }
    }
}

/// Payload of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Payload of `POST /auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: login envelope deserializes with nested auth payload.
    #[test]
    fn test_auth_envelope() {
        let envelope: ApiEnvelope<AuthData> = serde_json::from_str(
            r#"{
                "success": true,
                "message": "Login successful",
                "data": {
                    "user": {"id": "u-1", "email": "a@b.com", "name": "A", "role": "admin"},
                    "token": "access-1",
                    "refreshToken": "refresh-1"
                }
            }"#,
        )
        .unwrap();

        let data = envelope.into_data().unwrap();
        assert_eq!(data.token, "access-1");
        assert_eq!(data.refresh_token, "refresh-1");
        assert!(data.user.is_admin());
    }

    /// Test: missing data yields the envelope message as the error.
    #[test]
    fn test_envelope_without_data() {
        let envelope: ApiEnvelope<TokenData> =
            serde_json::from_str(r#"{"success": false, "message": "Invalid credentials"}"#)
                .unwrap();

        let err = envelope.into_data().unwrap_err();
        assert_eq!(err.as_deref(), Some("Invalid credentials"));
    }
}
