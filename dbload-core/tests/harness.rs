use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use dbload_core::{
    CancellationToken, Error, Operations, RunConfig, cleanup, operation_names, prepare, run,
};

#[derive(Debug, Clone, Copy, strum::EnumString, strum::Display, strum::VariantNames)]
#[strum(serialize_all = "snake_case")]
enum StubOp {
    Simple,
    IndexedFind,
    NonindexedFind,
}

#[derive(Debug, thiserror::Error)]
#[error("stub failure for worker {0}")]
struct StubError(u64);

#[derive(Debug, Default)]
struct Stub {
    delay: Duration,
    fail_worker: Option<u64>,
    panic_worker: Option<u64>,
    fail_populate: bool,
    calls: AtomicU64,
    populated: Mutex<Vec<u64>>,
    indexed: AtomicBool,
    purged: AtomicBool,
}

impl Operations for Stub {
    type Operation = StubOp;
    type Error = StubError;

    async fn populate(&self, count: u64) -> Result<(), StubError> {
        if self.fail_populate {
            return Err(StubError(u64::MAX));
        }
        self.populated
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(count);
        Ok(())
    }

    async fn ensure_index(&self) -> Result<(), StubError> {
        self.indexed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn purge(&self) -> Result<(), StubError> {
        self.purged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn invoke(&self, _operation: StubOp, worker_id: u64) -> Result<(), StubError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_worker == Some(worker_id) {
            return Err(StubError(worker_id));
        }
        if self.panic_worker == Some(worker_id) {
            panic!("stub panic in worker {worker_id}");
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }
}

fn config(op: &str) -> dbload_core::RunConfigBuilder {
    RunConfig::builder(op)
}

fn build(builder: dbload_core::RunConfigBuilder) -> RunConfig {
    builder
        .build(operation_names::<Stub>())
        .unwrap_or_else(|e| panic!("expected valid config: {e}"))
}

#[tokio::test]
async fn three_workers_five_iterations_each() -> anyhow::Result<()> {
    let cfg = build(config("simple").threads(3).iterations(5).sleep_bounds(0, 0));
    let stub = Arc::new(Stub::default());

    let report = run(stub.clone(), &cfg, CancellationToken::new()).await?;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failed_workers(), 0);
    assert!(!report.cancelled);

    let ids: Vec<u64> = report.results().map(|r| r.worker_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    for r in report.results() {
        assert_eq!(r.samples.len(), 5);
        let mean = r.mean.unwrap_or_else(|| panic!("worker {} has no mean", r.worker_id));
        assert!(mean >= 0.0);
        let recomputed = r.samples.iter().sum::<f64>() / r.samples.len() as f64;
        assert_eq!(mean, recomputed);
    }

    assert_eq!(stub.calls.load(Ordering::Relaxed), 15);
    assert_eq!(report.total_calls(), 15);
    Ok(())
}

#[tokio::test]
async fn worker_ids_cover_range_without_gaps() -> anyhow::Result<()> {
    let cfg = build(config("indexed_find").threads(16).iterations(1));
    let report = run(Arc::new(Stub::default()), &cfg, CancellationToken::new()).await?;

    let ids: BTreeSet<u64> = report.results().map(|r| r.worker_id).collect();
    assert_eq!(ids, (0..16).collect::<BTreeSet<u64>>());
    Ok(())
}

#[tokio::test]
async fn iteration_cap_wins_over_long_duration() -> anyhow::Result<()> {
    let cfg = build(
        config("simple")
            .threads(2)
            .iterations(3)
            .duration(Duration::from_secs(3_600)),
    );
    let report = run(Arc::new(Stub::default()), &cfg, CancellationToken::new()).await?;

    for r in report.results() {
        assert_eq!(r.samples.len(), 3);
    }
    Ok(())
}

#[tokio::test]
async fn iteration_cap_wins_over_short_duration() -> anyhow::Result<()> {
    let cfg = build(
        config("simple")
            .threads(2)
            .iterations(5)
            .duration(Duration::from_millis(100))
            .sleep_bounds(1, 1),
    );
    let report = run(Arc::new(Stub::default()), &cfg, CancellationToken::new()).await?;

    assert_eq!(report.successful_workers(), 2);
    for r in report.results() {
        assert_eq!(r.samples.len(), 5, "worker {}", r.worker_id);
    }
    // Four 1s pauses between five calls.
    assert!(report.span >= Duration::from_secs(4), "span {:?}", report.span);
    Ok(())
}

#[tokio::test]
async fn duration_bound_holds_every_worker_at_least_that_long() -> anyhow::Result<()> {
    let bound = Duration::from_millis(200);
    let cfg = build(config("simple").threads(2).duration(bound));
    let stub = Stub {
        delay: Duration::from_millis(10),
        ..Stub::default()
    };

    let report = run(Arc::new(stub), &cfg, CancellationToken::new()).await?;

    assert_eq!(report.successful_workers(), 2);
    for r in report.results() {
        assert!(!r.samples.is_empty());
        assert!(r.wall_time() >= bound, "wall time {:?}", r.wall_time());
    }
    assert!(report.span >= bound);
    Ok(())
}

#[tokio::test]
async fn one_failing_worker_does_not_sink_the_run() -> anyhow::Result<()> {
    let cfg = build(config("nonindexed_find").threads(3).iterations(4));
    let stub = Stub {
        fail_worker: Some(1),
        ..Stub::default()
    };

    let report = run(Arc::new(stub), &cfg, CancellationToken::new()).await?;

    assert_eq!(report.successful_workers(), 2);
    assert_eq!(report.failed_workers(), 1);

    let failure = report
        .failures()
        .next()
        .unwrap_or_else(|| panic!("expected a failure"));
    assert_eq!(failure.worker_id, 1);
    assert_eq!(failure.completed, 0);
    assert!(failure.error.contains("stub failure for worker 1"));

    for r in report.results() {
        assert_eq!(r.samples.len(), 4);
    }
    Ok(())
}

#[tokio::test]
async fn panicking_worker_is_recorded_as_failure() -> anyhow::Result<()> {
    let cfg = build(config("simple").threads(3).iterations(2));
    let stub = Stub {
        panic_worker: Some(1),
        ..Stub::default()
    };

    let report = run(Arc::new(stub), &cfg, CancellationToken::new()).await?;

    assert_eq!(report.successful_workers(), 2);
    assert_eq!(report.failed_workers(), 1);

    let failure = report
        .failures()
        .next()
        .unwrap_or_else(|| panic!("expected a failure"));
    assert_eq!(failure.worker_id, 1);
    assert_eq!(failure.completed, 0);
    assert!(failure.error.contains("panicked"), "{}", failure.error);

    let ok_ids: Vec<u64> = report.results().map(|r| r.worker_id).collect();
    assert_eq!(ok_ids, vec![0, 2]);
    Ok(())
}

#[tokio::test]
async fn cancelled_before_start_yields_no_samples() -> anyhow::Result<()> {
    let cfg = build(config("simple").threads(2).allow_unbounded(true));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run(Arc::new(Stub::default()), &cfg, cancel).await?;

    assert!(report.cancelled);
    assert_eq!(report.successful_workers(), 2);
    for r in report.results() {
        assert!(r.samples.is_empty());
        assert_eq!(r.mean, None);
    }
    assert!(report.overall().is_none());
    Ok(())
}

#[tokio::test]
async fn cancellation_stops_an_unbounded_run() -> anyhow::Result<()> {
    let cfg = build(config("simple").threads(4).allow_unbounded(true));
    let stub = Stub {
        delay: Duration::from_millis(5),
        ..Stub::default()
    };
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        })
    };

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        run(Arc::new(stub), &cfg, cancel),
    )
    .await??;
    canceller.await?;

    assert!(report.cancelled);
    assert_eq!(report.successful_workers(), 4);
    assert!(report.results().any(|r| !r.samples.is_empty()));
    Ok(())
}

#[tokio::test]
async fn cancellation_interrupts_jitter_sleep() -> anyhow::Result<()> {
    let cfg = build(config("simple").threads(1).iterations(10).sleep_bounds(60, 60));
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        run(Arc::new(Stub::default()), &cfg, cancel),
    )
    .await??;
    canceller.await?;

    let r = report
        .results()
        .next()
        .unwrap_or_else(|| panic!("expected a result"));
    assert_eq!(r.samples.len(), 1);
    Ok(())
}

#[tokio::test]
async fn jitter_paces_calls_but_not_after_the_last_one() -> anyhow::Result<()> {
    let stub = Arc::new(Stub::default());

    let single = build(config("simple").iterations(1).sleep_bounds(1, 1));
    let report = run(stub.clone(), &single, CancellationToken::new()).await?;
    assert!(report.span < Duration::from_secs(1), "span {:?}", report.span);

    let paced = build(config("simple").iterations(2).sleep_bounds(1, 1));
    let report = run(stub, &paced, CancellationToken::new()).await?;
    assert!(report.span >= Duration::from_secs(1), "span {:?}", report.span);
    Ok(())
}

#[tokio::test]
async fn run_rejects_config_built_for_another_operation_set() -> anyhow::Result<()> {
    let cfg = RunConfig::builder("write")
        .iterations(1)
        .build(&["read", "write"])?;

    let err = match run(Arc::new(Stub::default()), &cfg, CancellationToken::new()).await {
        Ok(_) => panic!("expected unknown operation"),
        Err(err) => err,
    };
    assert!(matches!(err, Error::UnknownOperation { .. }));
    Ok(())
}

#[tokio::test]
async fn prepare_populates_then_indexes() -> anyhow::Result<()> {
    let stub = Stub::default();
    prepare(&stub, 250).await?;

    let populated = stub
        .populated
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();
    assert_eq!(populated, vec![250]);
    assert!(stub.indexed.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn prepare_with_no_documents_still_indexes() -> anyhow::Result<()> {
    let stub = Stub::default();
    prepare(&stub, 0).await?;

    assert!(stub.indexed.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn prepare_propagates_populate_failure() {
    let stub = Stub {
        fail_populate: true,
        ..Stub::default()
    };

    let err = match prepare(&stub, 10).await {
        Ok(()) => panic!("expected populate failure"),
        Err(err) => err,
    };
    assert!(matches!(err, Error::Collaborator { stage: "populate", .. }));
    assert!(!stub.indexed.load(Ordering::SeqCst));
    assert!(!err.is_invalid_input());
}

#[tokio::test]
async fn cleanup_purges() -> anyhow::Result<()> {
    let stub = Stub::default();
    cleanup(&stub).await?;
    assert!(stub.purged.load(Ordering::SeqCst));
    Ok(())
}
