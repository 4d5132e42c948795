use std::time::Duration;

use super::error::{Error, Result};
use super::jitter::Jitter;

/// Where the collaborator should connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub collection: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 27017,
            database: "dbload".to_string(),
            collection: "dbload".to_string(),
        }
    }
}

/// Validated, immutable configuration for one run.
///
/// Only [`RunConfigBuilder::build`] creates these, so every `RunConfig` in circulation has
/// `min <= max`, at least one worker and a known operation name.
#[derive(Debug, Clone)]
pub struct RunConfig {
    operation: String,
    jitter: Jitter,
    threads: u64,
    duration: Option<Duration>,
    iterations: Option<u64>,
    documents: u64,
    target: Target,
}

impl RunConfig {
    pub fn builder(operation: impl Into<String>) -> RunConfigBuilder {
        RunConfigBuilder {
            operation: operation.into(),
            min_sleep: 0,
            max_sleep: 0,
            threads: 1,
            duration: Duration::ZERO,
            iterations: 0,
            documents: 0,
            target: Target::default(),
            allow_unbounded: false,
        }
    }

    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    #[must_use]
    pub fn jitter(&self) -> Jitter {
        self.jitter
    }

    #[must_use]
    pub fn threads(&self) -> u64 {
        self.threads
    }

    /// Time bound per worker. `None` means unbounded on the time axis.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Call cap per worker. `None` means unbounded on the count axis.
    #[must_use]
    pub fn iterations(&self) -> Option<u64> {
        self.iterations
    }

    #[must_use]
    pub fn documents(&self) -> u64 {
        self.documents
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Neither bound is set; workers only stop when the run is cancelled.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.duration.is_none() && self.iterations.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct RunConfigBuilder {
    operation: String,
    min_sleep: u64,
    max_sleep: u64,
    threads: u64,
    duration: Duration,
    iterations: u64,
    documents: u64,
    target: Target,
    allow_unbounded: bool,
}

impl RunConfigBuilder {
    /// Jitter bounds in whole seconds.
    pub fn sleep_bounds(mut self, min: u64, max: u64) -> Self {
        self.min_sleep = min;
        self.max_sleep = max;
        self
    }

    pub fn threads(mut self, threads: u64) -> Self {
        self.threads = threads;
        self
    }

    /// Zero means no time bound.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Zero means no iteration cap.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn documents(mut self, documents: u64) -> Self {
        self.documents = documents;
        self
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Accept `duration == 0 && iterations == 0` as "run until cancelled".
    pub fn allow_unbounded(mut self, allow: bool) -> Self {
        self.allow_unbounded = allow;
        self
    }

    /// Validates the collected values against `known_operations`.
    pub fn build(self, known_operations: &[&str]) -> Result<RunConfig> {
        if self.threads == 0 {
            return Err(Error::InvalidThreads);
        }

        if self.min_sleep > self.max_sleep {
            return Err(Error::InvalidSleepBounds {
                min: self.min_sleep,
                max: self.max_sleep,
            });
        }

        if !known_operations.contains(&self.operation.as_str()) {
            return Err(Error::UnknownOperation {
                name: self.operation,
                available: known_operations.join(", "),
            });
        }

        let duration = (!self.duration.is_zero()).then_some(self.duration);
        let iterations = (self.iterations != 0).then_some(self.iterations);
        if duration.is_none() && iterations.is_none() && !self.allow_unbounded {
            return Err(Error::Unbounded);
        }

        Ok(RunConfig {
            operation: self.operation,
            jitter: Jitter::new(self.min_sleep, self.max_sleep),
            threads: self.threads,
            duration,
            iterations,
            documents: self.documents,
            target: self.target,
        })
    }
}
