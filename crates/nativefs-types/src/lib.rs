//! Core types for the nativefs filesystem and transfer bridge.
//!
//! This crate provides the vocabulary shared by every other nativefs crate:
//!
//! - [`NativeFsError`] - Error taxonomy for validation, encoding and transfers
//! - [`JobId`] / [`JobState`] - Transfer job identity and lifecycle
//! - [`TransferEvent`] - Begin/progress events published per job
//! - [`DownloadRequest`] / [`UploadRequest`] - Validated transfer requests
//! - [`Encoding`] - utf8/ascii/base64 content codec
//! - [`normalize_file_path`] - `file://` prefix stripping
//! - [`NativeEngine`] - The contract host engines implement

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod encoding;
mod engine;
mod error;
mod event;
mod fs;
mod job;
mod path;
mod request;

pub use encoding::{
    Encoding, EncodingOptions, IntoEncodingOptions, decode, decode_transport, encode,
    encode_transport,
};
pub use engine::{Capability, NativeEngine, unsupported};
pub use error::{NativeFsError, Result};
pub use event::{
    DownloadBegin, DownloadProgress, EventHandler, EventKind, TransferEvent, UploadBegin,
    UploadProgress,
};
pub use fs::{
    DirectoryPaths, FileType, FsInfo, HashAlgorithm, MkdirOptions, NativeStat, ReadDirItem,
    StatResult,
};
pub use job::{JobId, JobState};
pub use path::{FILE_SCHEME, normalize_file_path};
pub use request::{
    DEFAULT_UPLOAD_METHOD, Direction, DownloadRequest, DownloadResult, TransferRequest,
    UploadFile, UploadRequest, UploadResult,
};
