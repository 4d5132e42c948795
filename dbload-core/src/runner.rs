mod config;
mod error;
mod gate;
mod jitter;
mod report;
mod run;
mod worker;

pub use config::{RunConfig, RunConfigBuilder, Target};
pub use error::{Error, Result};
pub use gate::IterationGate;
pub use jitter::Jitter;
pub use report::{AggregateReport, SampleStats, WorkerFailure, WorkerOutcome, WorkerResult};
pub use run::{cleanup, prepare, run};
