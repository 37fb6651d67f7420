#![doc = include_str!("../README.md")]

mod allocator;
mod config;
mod digest;
mod error;
mod pending;
mod pipeline;
mod pool;
mod queue;
mod record;
mod service;
mod stats;
mod store;
mod time;

pub use crate::allocator::*;
pub use crate::config::*;
pub use crate::digest::*;
pub use crate::error::*;
pub use crate::pending::*;
pub use crate::pipeline::*;
pub use crate::pool::*;
pub use crate::queue::*;
pub use crate::record::*;
pub use crate::service::*;
pub use crate::stats::*;
pub use crate::store::*;
pub use crate::time::*;
