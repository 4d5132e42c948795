use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::{Operations, operation_names};

use super::config::RunConfig;
use super::error::{Error, Result};
use super::report::{AggregateReport, WorkerFailure, WorkerOutcome};
use super::worker::{WorkerPlan, run_worker};

/// Seeds `documents` synthetic documents and makes sure the secondary index exists.
///
/// Failures are propagated as-is; nothing is retried.
pub async fn prepare<O: Operations>(ops: &O, documents: u64) -> Result<()> {
    tracing::info!(documents, "populating collection");
    let started = Instant::now();
    ops.populate(documents)
        .await
        .map_err(|e| Error::collaborator("populate", e))?;
    ops.ensure_index()
        .await
        .map_err(|e| Error::collaborator("create index", e))?;
    tracing::info!(elapsed = ?started.elapsed(), "collection ready");
    Ok(())
}

/// Drops the target collection. Callers treat a failure here as a warning.
pub async fn cleanup<O: Operations>(ops: &O) -> Result<()> {
    tracing::info!("dropping collection");
    ops.purge()
        .await
        .map_err(|e| Error::collaborator("cleanup", e))
}

/// Runs `config.threads()` workers until each one reaches its bound, or until `cancel` fires.
///
/// All workers are spawned before any is awaited. A failing worker is recorded in the report
/// and never aborts its siblings.
pub async fn run<O: Operations>(
    ops: Arc<O>,
    config: &RunConfig,
    cancel: CancellationToken,
) -> Result<AggregateReport> {
    let operation: O::Operation =
        config
            .operation()
            .parse()
            .map_err(|_| Error::UnknownOperation {
                name: config.operation().to_string(),
                available: operation_names::<O>().join(", "),
            })?;

    let plan = WorkerPlan {
        iterations: config.iterations(),
        duration: config.duration(),
        jitter: config.jitter(),
    };

    tracing::info!(
        %operation,
        threads = config.threads(),
        iterations = ?config.iterations(),
        duration = ?config.duration(),
        "starting run"
    );

    let started = Instant::now();
    let handles: Vec<_> = (0..config.threads())
        .map(|worker_id| {
            let ops = ops.clone();
            let cancel = cancel.clone();
            (
                worker_id,
                tokio::spawn(run_worker(ops, operation, plan, worker_id, cancel)),
            )
        })
        .collect();

    let mut outcomes: Vec<WorkerOutcome> = Vec::with_capacity(handles.len());
    for (worker_id, handle) in handles {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(worker_id, error = %err, "worker task did not complete");
                Err(WorkerFailure {
                    worker_id,
                    error: Error::Join(err).to_string(),
                    completed: 0,
                    failed_at: Instant::now(),
                })
            }
        };
        outcomes.push(outcome);
    }

    let report = AggregateReport::new(
        config.operation().to_string(),
        started,
        outcomes,
        cancel.is_cancelled(),
    );
    tracing::info!(
        span = ?report.span,
        succeeded = report.successful_workers(),
        failed = report.failed_workers(),
        "run finished"
    );
    Ok(report)
}
