use std::time::{Duration, Instant};

/// Decides, before every call, whether a worker may make another one.
///
/// Each worker owns its own gate; the iteration count is the worker's own sample count.
/// An iteration cap takes precedence: when one is set the deadline is ignored, so every
/// worker records exactly that many samples.
#[derive(Debug, Clone)]
pub struct IterationGate {
    iterations: Option<u64>,
    deadline: Option<Instant>,
}

impl IterationGate {
    pub fn new(iterations: Option<u64>, duration: Option<Duration>, started: Instant) -> Self {
        Self {
            iterations,
            deadline: match iterations {
                Some(_) => None,
                None => duration.map(|d| started + d),
            },
        }
    }

    #[must_use]
    pub fn allows_at(&self, completed: u64, now: Instant) -> bool {
        if let Some(deadline) = self.deadline
            && now >= deadline
        {
            return false;
        }

        if let Some(total) = self.iterations
            && completed >= total
        {
            return false;
        }

        true
    }

    #[must_use]
    pub fn allows(&self, completed: u64) -> bool {
        // Hot path: avoid timekeeping entirely unless we're in duration mode.
        if self.deadline.is_none() {
            return self.iterations.is_none_or(|total| completed < total);
        }
        self.allows_at(completed, Instant::now())
    }
}
