use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::Operations;

use super::gate::IterationGate;
use super::jitter::Jitter;
use super::report::{WorkerFailure, WorkerOutcome, WorkerResult};

/// The per-worker slice of a [`super::RunConfig`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct WorkerPlan {
    pub iterations: Option<u64>,
    pub duration: Option<Duration>,
    pub jitter: Jitter,
}

pub(crate) async fn run_worker<O: Operations>(
    ops: Arc<O>,
    operation: O::Operation,
    plan: WorkerPlan,
    worker_id: u64,
    cancel: CancellationToken,
) -> WorkerOutcome {
    let started = Instant::now();
    let gate = IterationGate::new(plan.iterations, plan.duration, started);
    let mut samples: Vec<f64> = Vec::with_capacity(initial_capacity(plan.iterations));

    tracing::debug!(worker_id, %operation, "worker started");

    while gate.allows(samples.len() as u64) && !cancel.is_cancelled() {
        let call_started = Instant::now();
        let res = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            res = ops.invoke(operation, worker_id) => res,
        };

        if let Err(err) = res {
            tracing::warn!(worker_id, %operation, error = %err, "operation failed, stopping worker");
            return Err(WorkerFailure {
                worker_id,
                error: err.to_string(),
                completed: samples.len() as u64,
                failed_at: Instant::now(),
            });
        }

        let elapsed = call_started.elapsed().as_secs_f64();
        tracing::trace!(worker_id, elapsed, "operation completed");
        samples.push(elapsed);

        // No point pausing when there will be no next call.
        if !gate.allows(samples.len() as u64) {
            break;
        }

        let pause = plan.jitter.sample(&mut rand::rng());
        if pause.is_zero() {
            continue;
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(pause) => {}
        }
    }

    let result = WorkerResult::finalize(worker_id, samples, started);
    tracing::debug!(
        worker_id,
        samples = result.samples.len(),
        mean = ?result.mean,
        "worker finished"
    );
    Ok(result)
}

fn initial_capacity(iterations: Option<u64>) -> usize {
    iterations.map_or(64, |n| n.min(4_096) as usize)
}
