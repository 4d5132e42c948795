mod format;
mod progress;
mod summary;

use progress::HumanProgress;

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput {
    progress: HumanProgress,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: HumanProgress::new(),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, tool: &str, config: &dbload_core::RunConfig) {
        print!("{}", summary::render_header(tool, config));
        println!();
    }

    fn run_started(&self, config: &dbload_core::RunConfig) {
        self.progress.start(config);
    }

    fn run_finished(&self) {
        self.progress.finish();
    }

    fn print_summary(&self, report: &dbload_core::AggregateReport) -> anyhow::Result<()> {
        print!("{}", summary::render(report));
        Ok(())
    }
}
