//! Transfer job registry and per-job event routing for nativefs.
//!
//! This crate owns the lifetime of transfer listeners:
//!
//! - [`JobRegistry`] - Allocates job ids and ties listeners to jobs
//! - [`Job`] - A job between allocation and settlement
//! - [`JobHandle`] - Awaitable handle to a job's terminal result
//! - [`EventBus`] - Subscribe/release capability the registry depends on
//! - [`LocalEventBus`] - In-process bus implementation
//! - [`EventSubscription`] - A registration released exactly once

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bus;
mod handle;
mod job;
mod registry;
mod subscription;

pub use bus::{EventBus, LocalEventBus, SubscriptionToken};
pub use handle::JobHandle;
pub use job::Job;
pub use registry::JobRegistry;
pub use subscription::EventSubscription;
