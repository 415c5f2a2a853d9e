//! Client-side session management for the admin surface.
//!
//! Three layers, bottom up: [`store::CredentialStore`] persists the access
//! token, refresh token, and cached user; [`manager::SessionManager`]
//! mediates every auth/profile intent against the backend; and
//! [`context::SessionContext`] is the single source of truth the
//! presentation layer reads.

pub mod context;
pub mod manager;
pub mod store;

pub use context::{Navigation, SessionContext};
pub use manager::SessionManager;
pub use store::CredentialStore;
