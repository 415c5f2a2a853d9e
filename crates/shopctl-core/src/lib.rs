//! Core shopctl library (config, API client, session management).

pub mod api;
pub mod config;
pub mod session;
