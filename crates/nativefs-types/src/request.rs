//! Normalized transfer requests and their terminal results.

use crate::JobId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default HTTP method for uploads.
pub const DEFAULT_UPLOAD_METHOD: &str = "POST";

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Remote to local.
    Download,
    /// Local to remote.
    Upload,
}

impl Direction {
    /// Returns the direction as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated download handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    /// The job this download runs under.
    pub job_id: JobId,
    /// Remote URL to fetch.
    pub from_url: String,
    /// Local destination (already normalized).
    pub to_file: PathBuf,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
    /// Whether the engine may continue the download in the background.
    pub background: bool,
    /// Progress granularity in percent; 0 reports every update.
    pub progress_divider: u32,
}

/// A local file attached to an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadFile {
    /// Form field name.
    pub name: String,
    /// File name sent to the server.
    pub filename: String,
    /// Local path to read from.
    pub filepath: PathBuf,
    /// MIME type, if known.
    pub filetype: Option<String>,
}

impl UploadFile {
    /// Creates a file entry with no explicit MIME type.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        filepath: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            filepath: filepath.into(),
            filetype: None,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn with_filetype(mut self, filetype: impl Into<String>) -> Self {
        self.filetype = Some(filetype.into());
        self
    }
}

/// A validated upload handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// The job this upload runs under.
    pub job_id: JobId,
    /// Remote URL to send to.
    pub to_url: String,
    /// Files to send (non-empty).
    pub files: Vec<UploadFile>,
    /// Extra request headers.
    pub headers: HashMap<String, String>,
    /// Extra form fields.
    pub fields: HashMap<String, String>,
    /// HTTP method.
    pub method: String,
}

/// A transfer request of either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum TransferRequest {
    /// See [`DownloadRequest`].
    Download(DownloadRequest),
    /// See [`UploadRequest`].
    Upload(UploadRequest),
}

impl TransferRequest {
    /// Returns the job id of the request.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        match self {
            Self::Download(r) => r.job_id,
            Self::Upload(r) => r.job_id,
        }
    }

    /// Returns the direction of the request.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::Download(_) => Direction::Download,
            Self::Upload(_) => Direction::Upload,
        }
    }
}

/// Terminal value of a successful download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResult {
    /// The job that produced this result.
    pub job_id: JobId,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Bytes written to the destination file.
    pub bytes_written: u64,
}

/// Terminal value of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    /// The job that produced this result.
    pub job_id: JobId,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body as text.
    pub body: String,
}
