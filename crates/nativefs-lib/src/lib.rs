//! Filesystem and job-tracked transfer bridge.
//!
//! This is a facade crate that re-exports functionality from the nativefs
//! workspace crates for convenient access.
//!
//! - [`NativeFs`] - Validating facade over a [`NativeEngine`]
//! - [`DownloadFileOptions`] / [`UploadFileOptions`] - Transfer options
//! - [`JobHandle`] - Awaitable result of a running transfer
//!
//! # Quick Start
//!
//! ```ignore
//! use nativefs_lib::prelude::*;
//!
//! let fs = NativeFs::local(EngineConfig::default())?;
//! fs.write_file("file:///tmp/hello.txt", "hello", Encoding::Utf8).await?;
//! assert_eq!(fs.read_file("/tmp/hello.txt", Encoding::Utf8).await?, "hello");
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod fs;
mod transfer;

// Re-export core types
pub use nativefs_types::*;

// Re-export job tracking
pub use nativefs_jobs::{
    EventBus, EventSubscription, Job, JobHandle, JobRegistry, LocalEventBus, SubscriptionToken,
};

// Re-export the local engine
#[cfg(feature = "local")]
pub use nativefs_engine::{EngineConfig, LocalEngine, ProgressGate};

pub use client::NativeFs;
pub use transfer::{
    DownloadBeginCallback, DownloadFileOptions, DownloadProgressCallback, UploadBeginCallback,
    UploadFileOptions, UploadProgressCallback,
};

/// Prelude module for convenient imports.
///
/// ```
/// use nativefs_lib::prelude::*;
/// ```
pub mod prelude {
    pub use nativefs_types::{
        DownloadBegin, DownloadProgress, DownloadResult, Encoding, EncodingOptions, HashAlgorithm,
        IntoEncodingOptions, JobId, MkdirOptions, NativeEngine, NativeFsError, Result, UploadBegin,
        UploadFile, UploadProgress, UploadResult, normalize_file_path,
    };

    pub use nativefs_jobs::JobHandle;

    #[cfg(feature = "local")]
    pub use nativefs_engine::{EngineConfig, LocalEngine};

    pub use crate::{DownloadFileOptions, NativeFs, UploadFileOptions};
}
