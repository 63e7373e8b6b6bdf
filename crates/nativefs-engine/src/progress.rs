//! Download progress throttling.

/// Decides which download progress updates are published.
///
/// With a divider of 0, or when the body length is unknown, every update is
/// published. Otherwise an update is published when the floored completion
/// percentage is a multiple of the divider and differs from the last
/// published one. The update that completes the body is always published.
#[derive(Debug, Clone)]
pub struct ProgressGate {
    divider: u64,
    content_length: Option<u64>,
    last_percent: Option<u64>,
    completed: bool,
}

impl ProgressGate {
    /// Creates a gate for a body of `content_length` bytes.
    #[must_use]
    pub const fn new(divider: u32, content_length: Option<u64>) -> Self {
        Self {
            divider: divider as u64,
            content_length,
            last_percent: None,
            completed: false,
        }
    }

    /// Returns true if the update at `bytes_written` should be published.
    pub fn should_emit(&mut self, bytes_written: u64) -> bool {
        let total = match self.content_length {
            Some(total) if total > 0 && self.divider > 0 => total,
            _ => return true,
        };

        if bytes_written >= total {
            let first = !self.completed;
            self.completed = true;
            self.last_percent = Some(100);
            return first;
        }

        let percent = bytes_written.saturating_mul(100) / total;
        if percent % self.divider != 0 || self.last_percent == Some(percent) {
            return false;
        }
        self.last_percent = Some(percent);
        true
    }
}
