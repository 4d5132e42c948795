use std::fmt::Write as _;

use dbload_core::{AggregateReport, RunConfig, SampleStats};

use super::format::{format_bound, format_secs, format_span};

pub(crate) fn render_header(tool: &str, config: &RunConfig) -> String {
    let mut out = String::new();
    let target = config.target();
    let jitter = config.jitter();

    writeln!(
        out,
        "{tool}: {}:{}/{}.{}",
        target.host, target.port, target.database, target.collection
    )
    .ok();
    writeln!(
        out,
        "operation: {} threads={} iterations={} duration={} pause=[{}s, {}s)",
        config.operation(),
        config.threads(),
        format_bound(config.iterations()),
        format_bound(config.duration().map(format_span)),
        jitter.min_secs(),
        jitter.min_secs() + jitter.max_secs(),
    )
    .ok();
    if config.is_unbounded() {
        out.push_str("running until interrupted (Ctrl-C)\n");
    }
    out
}

pub(crate) fn render(report: &AggregateReport) -> String {
    let mut out = String::new();

    writeln!(
        out,
        "summary: operation={} span={}{}",
        report.operation,
        format_span(report.span),
        if report.cancelled { " (interrupted)" } else { "" }
    )
    .ok();

    for outcome in &report.outcomes {
        match outcome {
            Ok(r) => match r.stats() {
                Some(stats) => {
                    writeln!(
                        out,
                        "  worker {}: {} wall={}",
                        r.worker_id,
                        render_stats(&stats),
                        format_span(r.wall_time())
                    )
                    .ok();
                }
                None => {
                    writeln!(
                        out,
                        "  worker {}: no samples wall={}",
                        r.worker_id,
                        format_span(r.wall_time())
                    )
                    .ok();
                }
            },
            Err(f) => {
                writeln!(
                    out,
                    "  worker {}: FAILED after {} calls: {}",
                    f.worker_id, f.completed, f.error
                )
                .ok();
            }
        }
    }

    writeln!(
        out,
        "workers: {} ok, {} failed",
        report.successful_workers(),
        report.failed_workers()
    )
    .ok();

    match report.overall() {
        Some(stats) => writeln!(out, "overall: {}", render_stats(&stats)).ok(),
        None => writeln!(out, "overall: no samples").ok(),
    };

    out
}

fn render_stats(stats: &SampleStats) -> String {
    format!(
        "samples={} mean={} min={} max={}",
        stats.count,
        format_secs(stats.mean),
        format_secs(stats.min),
        format_secs(stats.max)
    )
}
