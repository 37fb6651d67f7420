//! Background persistence workers.
//!
//! ## Structure
//!
//! - [`manager`] - [`WorkerPool`], which spawns and stops the workers.
//! - [`worker`] - the per-worker receive, delay, store loop.

mod manager;
mod worker;

pub use manager::*;
pub use worker::*;
