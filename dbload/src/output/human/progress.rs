use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Spinner (or bar, when the run has a time bound) on stderr while workers are running.
pub(crate) struct HumanProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl HumanProgress {
    pub(crate) fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    pub(crate) fn start(&self, config: &dbload_core::RunConfig) {
        let pb = match config.duration() {
            Some(total) => {
                let pb = ProgressBar::with_draw_target(
                    Some(total.as_millis() as u64),
                    ProgressDrawTarget::stderr_with_hz(5),
                );
                pb.set_style(bar_style());
                pb
            }
            None => {
                let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(5));
                pb.set_style(spinner_style());
                pb
            }
        };

        pb.set_prefix(config.operation().to_string());
        pb.set_message(format!("{} workers", config.threads()));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Some(total) = config.duration() {
            let bar = pb.clone();
            let total_ms = total.as_millis() as u64;
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_millis(200));
                while !bar.is_finished() {
                    interval.tick().await;
                    bar.set_position((bar.elapsed().as_millis() as u64).min(total_ms));
                }
            });
        }

        let mut slot = self
            .bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(old) = slot.replace(pb) {
            old.finish_and_clear();
        }
    }

    pub(crate) fn finish(&self) {
        let mut slot = self
            .bar
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pb) = slot.take() {
            pb.finish_and_clear();
        }
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} [ {bar:20.cyan/blue} ] {percent:>3}% {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█░")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} {spinner} {msg} {elapsed}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
