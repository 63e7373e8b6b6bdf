//! Caller-side handle to a running transfer job.

use nativefs_types::{JobId, NativeFsError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

/// Handle returned when a transfer job starts.
///
/// Await the handle to get the job's terminal result. Dropping it detaches:
/// the transfer keeps running and its listeners are still released when it
/// settles.
pub struct JobHandle<T> {
    job_id: JobId,
    task: JoinHandle<Result<T>>,
}

impl<T> JobHandle<T> {
    pub(crate) const fn new(job_id: JobId, task: JoinHandle<Result<T>>) -> Self {
        Self { job_id, task }
    }

    /// Returns the id of the job, usable for cancellation.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns true once the job has settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl<T> Future for JobHandle<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.task).poll(cx).map(|joined| {
            joined.unwrap_or_else(|e| {
                Err(NativeFsError::transfer_failed(
                    this.job_id,
                    NativeFsError::Native(format!("transfer task aborted: {e}")),
                ))
            })
        })
    }
}

impl<T> std::fmt::Debug for JobHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("job_id", &self.job_id)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
