//! Long-running jobs spawned next to the HTTP server.
//!
//! Each job loops until its [`CancellationToken`] fires, which main ties
//! into the shutdown sequence so jobs drain before the process exits.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod session_cleanup;
