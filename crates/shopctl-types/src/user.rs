//! User records as returned by the admin REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Privilege level of a user account.
///
/// Only `Admin` may access the admin surface; anything else is treated as
/// unprivileged. Unrecognized roles deserialize to `Unknown` rather than
/// failing, so a newer backend cannot brick the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Returns true for the admin role.
    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Snapshot of the authenticated principal.
///
/// Field names follow the backend's camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Returns true if this user may access the admin surface.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Partial profile update sent to `PUT /users/profile`.
///
/// Only fields that are `Some` are serialized; the backend leaves the rest
/// untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UserUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.address.is_none()
    }
}
