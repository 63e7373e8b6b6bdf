//! Local host engine for nativefs.
//!
//! This crate implements [`nativefs_types::NativeEngine`] for hosts with a
//! regular filesystem and network stack:
//!
//! - [`LocalEngine`] - Filesystem calls on `tokio::fs`, transfers on reqwest
//! - [`EngineConfig`] - Client timeouts, asset and bundle directories
//! - [`ProgressGate`] - Download progress throttling

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod dirs;
mod engine;
mod fs;
mod progress;
mod transfer;

pub use config::EngineConfig;
pub use engine::LocalEngine;
pub use progress::ProgressGate;
