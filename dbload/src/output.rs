use crate::cli::OutputFormat;

mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, tool: &str, config: &dbload_core::RunConfig);
    fn run_started(&self, config: &dbload_core::RunConfig);
    fn run_finished(&self);
    fn print_summary(&self, report: &dbload_core::AggregateReport) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new()),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
