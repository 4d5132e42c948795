use std::time::{Duration, Instant};

/// Timing collected by one worker that ran to completion.
#[derive(Debug, Clone)]
pub struct WorkerResult {
    pub worker_id: u64,
    /// Elapsed seconds of every call, in call order.
    pub samples: Vec<f64>,
    pub started: Instant,
    pub finished: Instant,
    /// `None` when the worker never got to make a call.
    pub mean: Option<f64>,
}

impl WorkerResult {
    pub(crate) fn finalize(worker_id: u64, samples: Vec<f64>, started: Instant) -> Self {
        let mean = mean(&samples);
        Self {
            worker_id,
            samples,
            started,
            finished: Instant::now(),
            mean,
        }
    }

    #[must_use]
    pub fn wall_time(&self) -> Duration {
        self.finished.saturating_duration_since(self.started)
    }

    #[must_use]
    pub fn stats(&self) -> Option<SampleStats> {
        SampleStats::from_samples(&self.samples)
    }
}

/// A worker whose operation call failed (or whose task panicked).
#[derive(Debug, Clone)]
pub struct WorkerFailure {
    pub worker_id: u64,
    pub error: String,
    /// Samples recorded before the failing call.
    pub completed: u64,
    pub failed_at: Instant,
}

pub type WorkerOutcome = std::result::Result<WorkerResult, WorkerFailure>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub count: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl SampleStats {
    #[must_use]
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mean = mean(samples)?;
        let (min, max) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });

        Some(Self {
            count: samples.len() as u64,
            mean,
            min,
            max,
        })
    }
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Everything a finished run produced, one outcome per worker ordered by worker id.
#[derive(Debug, Clone)]
pub struct AggregateReport {
    pub operation: String,
    pub started: Instant,
    /// From run start until the last worker ended.
    pub span: Duration,
    pub outcomes: Vec<WorkerOutcome>,
    /// Set when the run was stopped from outside before the workers hit their bounds.
    pub cancelled: bool,
}

impl AggregateReport {
    pub(crate) fn new(
        operation: String,
        started: Instant,
        outcomes: Vec<WorkerOutcome>,
        cancelled: bool,
    ) -> Self {
        let last_end = outcomes
            .iter()
            .map(|o| match o {
                Ok(r) => r.finished,
                Err(f) => f.failed_at,
            })
            .max()
            .unwrap_or(started);

        Self {
            operation,
            started,
            span: last_end.saturating_duration_since(started),
            outcomes,
            cancelled,
        }
    }

    pub fn results(&self) -> impl Iterator<Item = &WorkerResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &WorkerFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    #[must_use]
    pub fn failed_workers(&self) -> usize {
        self.failures().count()
    }

    #[must_use]
    pub fn successful_workers(&self) -> usize {
        self.results().count()
    }

    /// Statistics over every sample of every successful worker.
    #[must_use]
    pub fn overall(&self) -> Option<SampleStats> {
        let all: Vec<f64> = self
            .results()
            .flat_map(|r| r.samples.iter().copied())
            .collect();
        SampleStats::from_samples(&all)
    }

    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.results().map(|r| r.samples.len() as u64).sum::<u64>()
            + self.failures().map(|f| f.completed).sum::<u64>()
    }
}
