//! HTTP boundary to the dashboard backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything authoritative (sessions, permissions, bans, live aggregation)
//! lives behind the backend API. This module only shapes requests, forwards
//! the staff session cookie and turns non-2xx responses into [`ApiError`]s
//! carrying the server's own explanation.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::ApiError;
