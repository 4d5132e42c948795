use clap::{Args, Parser, Subcommand};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

fn parse_duration(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("duration cannot be empty (expected e.g. 10, 10s, 250ms, 1m, 500us)".to_string());
    }

    let number_end = s
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_digit())
        .map_or(s.len(), |(idx, _)| idx);

    if number_end == 0 {
        return Err(format!(
            "invalid duration '{s}' (expected e.g. 10, 10s, 250ms, 1m, 500us)"
        ));
    }

    let (number_str, unit_str) = s.split_at(number_end);
    let value: u64 = number_str
        .parse()
        .map_err(|_| format!("invalid duration '{s}' (expected e.g. 10, 10s, 250ms, 1m, 500us)"))?;

    // A bare number is seconds.
    match unit_str.trim() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(value)),
        "ms" | "msec" | "msecs" | "millisecond" | "milliseconds" => {
            Ok(Duration::from_millis(value))
        }
        "us" | "µs" | "usec" | "usecs" | "microsecond" | "microseconds" => {
            Ok(Duration::from_micros(value))
        }
        "ns" | "nsec" | "nsecs" | "nanosecond" | "nanoseconds" => Ok(Duration::from_nanos(value)),
        "m" | "min" | "mins" | "minute" | "minutes" => {
            let secs = value
                .checked_mul(60)
                .ok_or_else(|| format!("duration '{s}' is too large"))?;
            Ok(Duration::from_secs(secs))
        }
        "h" | "hr" | "hrs" | "hour" | "hours" => {
            let secs = value
                .checked_mul(60)
                .and_then(|v| v.checked_mul(60))
                .ok_or_else(|| format!("duration '{s}' is too large"))?;
            Ok(Duration::from_secs(secs))
        }
        _ => Err(format!(
            "invalid duration '{s}' (expected e.g. 10, 10s, 250ms, 1m, 500us)"
        )),
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    HumanReadable,
    /// Emit a single JSON summary line (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "dbload",
    author,
    version,
    about = "Load generator for MongoDB",
    long_about = "dbload puts load on a MongoDB collection.\n\n`rw` loops reading or writing a fixed dummy document at random intervals.\n`bench` seeds test data, runs a named query from N concurrent workers for a fixed duration or iteration count, and reports per-worker timing.\n\nEvery connection flag can also be set through its DBLOAD_* environment variable.",
    after_help = "Examples:\n  dbload rw --op write --min 1 --max 5\n  dbload bench --op indexed_find --threads 8 --iterations 500\n  dbload bench --op nonindexed_find --docs 100000 --duration 1m --output json"
)]
pub struct Cli {
    /// Log level for dbload itself (RUST_LOG, when set, takes precedence)
    #[arg(long, global = true, env = "DBLOAD_LOG", default_value = "warn")]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Loop reading or writing a fixed dummy document
    #[command(
        long_about = "Loop reading or writing a fixed dummy document, sleeping a random interval between calls. Writes overwrite the dummy document in place; the collection is dropped when the loop ends unless --keep is given.\n\nWithout --duration or --iterations the loop runs until interrupted with Ctrl-C."
    )]
    Rw(RwArgs),

    /// Run a named benchmark query from concurrent workers
    #[command(
        long_about = "Seed the collection, run a named benchmark query from --threads workers until --duration or --iterations is reached, report per-worker timing and drop the collection."
    )]
    Bench(BenchArgs),
}

#[derive(Debug, Args)]
pub struct RwArgs {
    /// Operation to run (read, write)
    #[arg(long, default_value = "read")]
    pub op: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 1)]
    pub threads: u64,

    /// Synthetic documents to insert next to the dummy document before starting
    #[arg(long, default_value_t = 0)]
    pub docs: u64,

    /// Keep the collection instead of dropping it when the loop ends
    #[arg(long)]
    pub keep: bool,

    #[command(flatten)]
    pub pacing: PacingArgs,

    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Benchmark query to run (simple, indexed_find, nonindexed_find)
    #[arg(long, default_value = "simple")]
    pub op: String,

    /// Number of concurrent workers
    #[arg(long, default_value_t = 4)]
    pub threads: u64,

    /// Synthetic documents to insert before the run (0 skips seeding)
    #[arg(long, default_value_t = 1000)]
    pub docs: u64,

    /// Keep the collection instead of dropping it after the run
    #[arg(long)]
    pub keep: bool,

    #[command(flatten)]
    pub pacing: PacingArgs,

    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct PacingArgs {
    /// Minimum pause between calls, in seconds
    #[arg(long, default_value_t = 0)]
    pub min: u64,

    /// Random spread added on top of --min, in seconds (pause is in [min, min + max))
    #[arg(long, default_value_t = 0)]
    pub max: u64,

    /// Run time per worker (e.g. 30, 30s, 500ms, 2m); 0 = no time bound
    #[arg(long, value_parser = parse_duration, default_value = "0")]
    pub duration: Duration,

    /// Calls per worker; 0 = no iteration cap
    #[arg(long, default_value_t = 0)]
    pub iterations: u64,
}

#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// MongoDB host
    #[arg(long, env = "DBLOAD_HOST", default_value = "localhost")]
    pub host: String,

    /// MongoDB port
    #[arg(long, env = "DBLOAD_PORT", default_value_t = 27017)]
    pub port: u16,

    /// Database name
    #[arg(long, env = "DBLOAD_DB", default_value = "dbload")]
    pub db: String,

    /// Collection name
    #[arg(long, env = "DBLOAD_COLLECTION", default_value = "dbload")]
    pub collection: String,

    /// Give up connecting after this long (e.g. 5s, 500ms)
    #[arg(long, value_parser = parse_duration, default_value = "5s")]
    pub connect_timeout: Duration,
}
