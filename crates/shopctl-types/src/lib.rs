//! Shared types for the shopctl admin client (users, REST envelopes).

pub mod api;
pub mod user;

pub use api::{ApiEnvelope, AuthData, TokenData};
pub use user::{User, UserRole, UserUpdate};
