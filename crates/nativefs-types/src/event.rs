//! Transfer events published by the engine and routed per job.

use crate::JobId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of per-job transfer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Download response headers arrived.
    DownloadBegin,
    /// Download bytes were written.
    DownloadProgress,
    /// Upload request is about to be sent.
    UploadBegin,
    /// Upload bytes were sent.
    UploadProgress,
}

impl EventKind {
    /// Returns the kind as used in event names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DownloadBegin => "DownloadBegin",
            Self::DownloadProgress => "DownloadProgress",
            Self::UploadBegin => "UploadBegin",
            Self::UploadProgress => "UploadProgress",
        }
    }

    /// Returns the bus event name for this kind scoped to `job_id`.
    ///
    /// ```
    /// use nativefs_types::{EventKind, JobId};
    ///
    /// assert_eq!(EventKind::DownloadBegin.event_name(JobId::new(3)), "DownloadBegin-3");
    /// ```
    #[must_use]
    pub fn event_name(&self, job_id: JobId) -> String {
        format!("{}-{}", self.as_str(), job_id)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a `DownloadBegin` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadBegin {
    /// The job the event belongs to.
    pub job_id: JobId,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Announced body length, if any.
    pub content_length: Option<u64>,
    /// Response headers.
    pub headers: HashMap<String, String>,
}

/// Payload of a `DownloadProgress` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// The job the event belongs to.
    pub job_id: JobId,
    /// Announced body length, if any.
    pub content_length: Option<u64>,
    /// Bytes written to the destination so far.
    pub bytes_written: u64,
}

impl DownloadProgress {
    /// Returns the completion percentage, if the length is known.
    #[must_use]
    pub fn percent(&self) -> Option<f64> {
        self.content_length
            .filter(|len| *len > 0)
            .map(|len| (self.bytes_written as f64 / len as f64) * 100.0)
    }
}

/// Payload of an `UploadBegin` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadBegin {
    /// The job the event belongs to.
    pub job_id: JobId,
}

/// Payload of an `UploadProgress` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// The job the event belongs to.
    pub job_id: JobId,
    /// Total bytes the upload will send.
    pub total_bytes_expected_to_send: u64,
    /// Bytes sent so far.
    pub total_bytes_sent: u64,
}

/// An event delivered on the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TransferEvent {
    /// See [`DownloadBegin`].
    DownloadBegin(DownloadBegin),
    /// See [`DownloadProgress`].
    DownloadProgress(DownloadProgress),
    /// See [`UploadBegin`].
    UploadBegin(UploadBegin),
    /// See [`UploadProgress`].
    UploadProgress(UploadProgress),
}

impl TransferEvent {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::DownloadBegin(_) => EventKind::DownloadBegin,
            Self::DownloadProgress(_) => EventKind::DownloadProgress,
            Self::UploadBegin(_) => EventKind::UploadBegin,
            Self::UploadProgress(_) => EventKind::UploadProgress,
        }
    }

    /// Returns the job this event belongs to.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        match self {
            Self::DownloadBegin(e) => e.job_id,
            Self::DownloadProgress(e) => e.job_id,
            Self::UploadBegin(e) => e.job_id,
            Self::UploadProgress(e) => e.job_id,
        }
    }

    /// Returns the bus event name this event is published under.
    #[must_use]
    pub fn name(&self) -> String {
        self.kind().event_name(self.job_id())
    }
}

/// Handler invoked for every event published under a subscribed name.
pub type EventHandler = Arc<dyn Fn(&TransferEvent) + Send + Sync>;
