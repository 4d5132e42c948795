mod ops;

pub mod runner;

pub use ops::{Operations, operation_names};
pub use runner::{
    AggregateReport, Error, Jitter, Result, RunConfig, RunConfigBuilder, SampleStats, Target,
    WorkerFailure, WorkerOutcome, WorkerResult, cleanup, prepare, run,
};
pub use tokio_util::sync::CancellationToken;
