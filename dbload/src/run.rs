use anyhow::Context as _;
use clap::CommandFactory as _;
use clap::error::ErrorKind;
use std::sync::Arc;

use dbload_core::{CancellationToken, Operations, RunConfig, Target, operation_names};
use dbload_mongo::{BenchQueries, ConnectOptions, MongoStore, RwQueries};

use crate::cli::{BenchArgs, Cli, ConnectArgs, PacingArgs, RwArgs};
use crate::exit_codes::ExitCode;
use crate::output::{self, OutputFormatter};
use crate::run_error::RunError;

pub async fn bench(args: BenchArgs) -> Result<ExitCode, RunError> {
    let out = output::formatter(args.output);

    let cfg = run_config(
        "bench",
        RunConfig::builder(args.op).threads(args.threads),
        &args.pacing,
        &args.connect,
        args.docs,
        false,
        operation_names::<BenchQueries>(),
    )?;

    let store = connect(&args.connect, &cfg).await?;
    let ops = Arc::new(BenchQueries::new(store));

    // Runs with `--docs 0` too: the indexed queries still need their index.
    dbload_core::prepare(ops.as_ref(), cfg.documents())
        .await
        .context("failed to prepare benchmark data")?;

    let code = execute("bench", ops.clone(), &cfg, out.as_ref()).await?;

    finish(ops.as_ref(), args.keep).await;
    Ok(code)
}

pub async fn rw(args: RwArgs) -> Result<ExitCode, RunError> {
    let out = output::formatter(args.output);

    let cfg = run_config(
        "rw",
        RunConfig::builder(args.op).threads(args.threads),
        &args.pacing,
        &args.connect,
        args.docs,
        true,
        operation_names::<RwQueries>(),
    )?;

    let store = connect(&args.connect, &cfg).await?;
    let ops = Arc::new(RwQueries::new(store));

    dbload_core::prepare(ops.as_ref(), cfg.documents())
        .await
        .context("failed to seed the dummy document")?;

    let code = execute("rw", ops.clone(), &cfg, out.as_ref()).await?;
    finish(ops.as_ref(), args.keep).await;
    Ok(code)
}

/// Drops the collection unless asked to keep it. A failed drop is only logged.
async fn finish<O: Operations>(ops: &O, keep: bool) {
    if keep {
        tracing::info!("keeping collection (--keep)");
    } else if let Err(err) = dbload_core::cleanup(ops).await {
        tracing::warn!(error = %err, "failed to drop collection");
    }
}

/// Resolves flags into a validated config; nothing has touched the network yet.
fn run_config(
    subcommand: &str,
    builder: dbload_core::RunConfigBuilder,
    pacing: &PacingArgs,
    connect: &ConnectArgs,
    documents: u64,
    allow_unbounded: bool,
    known_operations: &[&str],
) -> Result<RunConfig, RunError> {
    builder
        .sleep_bounds(pacing.min, pacing.max)
        .duration(pacing.duration)
        .iterations(pacing.iterations)
        .documents(documents)
        .target(Target {
            host: connect.host.clone(),
            port: connect.port,
            database: connect.db.clone(),
            collection: connect.collection.clone(),
        })
        .allow_unbounded(allow_unbounded)
        .build(known_operations)
        .map_err(|err| {
            if err.is_invalid_input() {
                RunError::Usage(usage_error(subcommand, err))
            } else {
                RunError::RuntimeError(err.into())
            }
        })
}

async fn connect(args: &ConnectArgs, cfg: &RunConfig) -> Result<MongoStore, RunError> {
    let target = cfg.target();
    let opts = ConnectOptions {
        host: target.host.clone(),
        port: target.port,
        database: target.database.clone(),
        collection: target.collection.clone(),
        // One connection per worker, plus one for setup and cleanup.
        max_pool_size: u32::try_from(cfg.threads().saturating_add(1)).unwrap_or(u32::MAX),
        server_selection_timeout: args.connect_timeout,
    };

    let store = MongoStore::connect(&opts)
        .await
        .context("cannot reach the database")?;
    Ok(store)
}

async fn execute<O: Operations>(
    tool: &str,
    ops: Arc<O>,
    cfg: &RunConfig,
    out: &dyn OutputFormatter,
) -> Result<ExitCode, RunError> {
    out.print_header(tool, cfg);

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    out.run_started(cfg);
    let res = dbload_core::run(ops, cfg, cancel).await;
    out.run_finished();
    interrupt.abort();

    let report = res.context("benchmark run failed")?;
    out.print_summary(&report)?;

    for failure in report.failures() {
        tracing::warn!(
            worker_id = failure.worker_id,
            error = %failure.error,
            "worker stopped early"
        );
    }

    Ok(ExitCode::from_failed_workers(report.failed_workers()))
}

fn cancel_on_ctrl_c(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("interrupted, stopping workers");
                cancel.cancel();
            }
            Err(err) => tracing::warn!(error = %err, "cannot listen for Ctrl-C"),
        }
    })
}

fn usage_error(subcommand: &str, message: impl std::fmt::Display) -> clap::Error {
    let mut cmd = Cli::command();
    cmd.build();
    if let Some(sub) = cmd.find_subcommand_mut(subcommand) {
        return sub.error(ErrorKind::ValueValidation, message);
    }
    cmd.error(ErrorKind::ValueValidation, message)
}
