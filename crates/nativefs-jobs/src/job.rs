//! A transfer job and the subscriptions it owns.

use crate::EventSubscription;
use nativefs_types::{JobId, JobState};

/// A transfer job between id allocation and settlement.
///
/// The job exclusively owns its event subscriptions. They are released when
/// the job settles, or when the job is dropped without settling (for example
/// if the transfer future panics or is abandoned).
#[derive(Debug)]
pub struct Job {
    id: JobId,
    state: JobState,
    subscriptions: Vec<EventSubscription>,
}

impl Job {
    pub(crate) const fn new(id: JobId) -> Self {
        Self {
            id,
            state: JobState::Created,
            subscriptions: Vec::new(),
        }
    }

    /// Returns the job id.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> JobState {
        self.state
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub(crate) fn attach(&mut self, subscription: EventSubscription) {
        self.subscriptions.push(subscription);
    }

    /// Marks the job as handed to the engine.
    pub(crate) fn mark_listening(&mut self) {
        self.state = self.state.advance(JobState::Listening);
    }

    /// Releases every subscription and moves to a terminal state.
    ///
    /// Returns the number of subscriptions released; settling twice releases
    /// nothing the second time and keeps the first terminal state.
    pub(crate) fn settle(&mut self, succeeded: bool) -> usize {
        let released = self.subscriptions.len();
        for subscription in self.subscriptions.drain(..) {
            subscription.release();
        }

        let terminal = if succeeded {
            JobState::Completed
        } else {
            JobState::Failed
        };
        self.state = self.state.advance(terminal);
        released
    }
}
