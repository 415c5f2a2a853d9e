//! Shared fixtures for session integration tests.

#![allow(dead_code)]

use serde_json::json;
use shopctl_core::config::Config;
use shopctl_core::session::{CredentialStore, SessionContext, SessionManager};
use shopctl_types::{User, UserRole};
use wiremock::MockServer;

/// A well-formed admin user as the backend would return it.
pub fn admin_user() -> User {
    User {
        id: "u-1".to_string(),
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        role: UserRole::Admin,
        is_email_verified: true,
        is_active: true,
        phone: None,
        address: None,
        created_at: None,
        updated_at: None,
    }
}

/// A valid but unprivileged user.
pub fn customer_user() -> User {
    User {
        role: UserRole::Customer,
        id: "u-2".to_string(),
        email: "shopper@example.com".to_string(),
        name: "Shopper".to_string(),
        ..admin_user()
    }
}

/// Successful login/register envelope for the given user.
pub fn auth_success_body(user: &User) -> serde_json::Value {
    json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "user": serde_json::to_value(user).unwrap(),
            "token": "access-1",
            "refreshToken": "refresh-1",
        }
    })
}

/// Profile envelope for the given user.
pub fn profile_body(user: &User) -> serde_json::Value {
    json!({
        "success": true,
        "data": serde_json::to_value(user).unwrap(),
    })
}

/// Store rooted in a per-test temp dir.
pub fn store_in(dir: &tempfile::TempDir) -> CredentialStore {
    CredentialStore::new(dir.path().join("credentials.json"))
}

/// Manager pointed at the mock server.
pub fn manager_for(server: &MockServer, store: &CredentialStore) -> SessionManager {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    SessionManager::new(&config, store.clone()).unwrap()
}

/// Context pointed at the mock server.
pub fn context_for(server: &MockServer, store: &CredentialStore) -> SessionContext {
    SessionContext::new(manager_for(server, store))
}

/// Seeds the store with a full session (access + refresh + user).
pub fn seed_session(store: &CredentialStore, user: &User) {
    store.set_access_token("access-1").unwrap();
    store.set_refresh_token("refresh-1").unwrap();
    store.set_user(user).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_success_body_shape() {
        let body = auth_success_body(&admin_user());
        assert_eq!(body["data"]["token"], "access-1");
        assert_eq!(body["data"]["user"]["role"], "admin");
    }
}
