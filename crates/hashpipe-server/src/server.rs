//! Process wiring around the [`hashpipe`] pipeline.
//!
//! ## Structure
//!
//! - [`config`] - CLI/environment configuration.
//! - [`error`] - mapping pipeline errors to HTTP responses.
//! - [`routes`] - the axum router and request handlers.
//! - [`shutdown`] - signal and endpoint driven shutdown.
//! - [`telemetry`] - logging, tracing and metrics setup.

pub mod config;
pub mod error;
pub mod routes;
pub mod shutdown;
pub mod telemetry;
