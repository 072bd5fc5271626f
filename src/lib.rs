#![deny(missing_docs)]

//! A bounded work-queue thread pool with order-preserving batch execution.
//!
//! This library distributes a batch of work items across a fixed set of
//! worker threads through a bounded circular queue and returns the results
//! in the original submission order, regardless of completion order.
//! Reference FNV-1a file-hashing executors are included as the canonical
//! workload plugged into the pool.

mod error;
mod executors;
/// The bounded-queue thread pool and its building blocks.
pub mod pool;

pub use error::{PoolError, Result};
pub use executors::{hash32, hash64};
pub use pool::{BatchPool, MAX_THREADS, QUEUE_CAPACITY};
