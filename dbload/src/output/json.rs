use serde::Serialize;
use std::io::Write as _;

use super::OutputFormatter;

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _tool: &str, _config: &dbload_core::RunConfig) {}

    fn run_started(&self, _config: &dbload_core::RunConfig) {}

    fn run_finished(&self) {}

    fn print_summary(&self, report: &dbload_core::AggregateReport) -> anyhow::Result<()> {
        let line = build_summary_line(report);
        emit_json_line(&line)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub operation: String,
    pub span_secs: f64,
    pub cancelled: bool,

    pub successful_workers: usize,
    pub failed_workers: usize,
    pub total_calls: u64,

    /// `null` when no worker recorded a sample.
    pub overall_mean_secs: Option<f64>,
    pub overall_samples: u64,

    pub workers: Vec<JsonWorker>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonWorker {
    pub worker_id: u64,
    pub status: &'static str,
    pub samples: u64,
    pub mean_secs: Option<f64>,
    pub min_secs: Option<f64>,
    pub max_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_secs: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub durations_secs: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn build_summary_line(report: &dbload_core::AggregateReport) -> JsonSummaryLine {
    let workers = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            Ok(r) => {
                let stats = r.stats();
                JsonWorker {
                    worker_id: r.worker_id,
                    status: "ok",
                    samples: r.samples.len() as u64,
                    mean_secs: r.mean,
                    min_secs: stats.map(|s| s.min),
                    max_secs: stats.map(|s| s.max),
                    wall_secs: Some(r.wall_time().as_secs_f64()),
                    durations_secs: r.samples.clone(),
                    error: None,
                }
            }
            Err(f) => JsonWorker {
                worker_id: f.worker_id,
                status: "failed",
                samples: f.completed,
                mean_secs: None,
                min_secs: None,
                max_secs: None,
                wall_secs: None,
                durations_secs: Vec::new(),
                error: Some(f.error.clone()),
            },
        })
        .collect();

    let overall = report.overall();

    JsonSummaryLine {
        kind: "summary",
        operation: report.operation.clone(),
        span_secs: report.span.as_secs_f64(),
        cancelled: report.cancelled,
        successful_workers: report.successful_workers(),
        failed_workers: report.failed_workers(),
        total_calls: report.total_calls(),
        overall_mean_secs: overall.map(|s| s.mean),
        overall_samples: overall.map_or(0, |s| s.count),
        workers,
    }
}

fn emit_json_line<T: Serialize>(line: &T) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, line)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
