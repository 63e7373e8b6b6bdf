//! Transfer job identity and lifecycle states.

use serde::{Deserialize, Serialize};

/// Identifier of a transfer job.
///
/// Ids are issued by a job registry in strictly increasing order starting at
/// 1 and are never reused, so they double as log correlation tokens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(u64);

impl JobId {
    /// Wraps a raw job id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle state of a transfer job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Id allocated, listeners may still be registered.
    #[default]
    Created,
    /// Handed to the engine, listeners are live.
    Listening,
    /// The engine reported success.
    Completed,
    /// The engine reported a failure.
    Failed,
}

impl JobState {
    /// Returns true if the job is in a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the state as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Listening => "listening",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns the state reached by moving to `next`.
    ///
    /// Terminal states absorb every transition, and a job never moves back to
    /// `Created`.
    #[must_use]
    pub const fn advance(self, next: Self) -> Self {
        match (self, next) {
            (Self::Completed | Self::Failed, _) | (_, Self::Created) => self,
            _ => next,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
