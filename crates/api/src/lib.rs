//! HTTP layer of the Vicinity backend.
//!
//! Built as a library so the integration tests under `tests/` can assemble
//! the same router the binary serves, state and middleware included.

pub mod auth;
pub mod background;
pub mod config;
pub mod drafts;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod transcribe;
