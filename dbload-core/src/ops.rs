use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// The data-access side of a benchmark run.
///
/// The harness only ever sees operation names and whether a call succeeded. Payloads,
/// queries and documents are entirely up to the implementor.
pub trait Operations: Send + Sync + 'static {
    /// The closed set of timed operations this collaborator can run.
    type Operation: Copy
        + Send
        + Sync
        + fmt::Display
        + FromStr
        + strum::VariantNames
        + 'static;

    type Error: std::error::Error + Send + Sync + 'static;

    /// Seed `count` synthetic documents into the target collection.
    fn populate(&self, count: u64) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Make sure the secondary index used by the indexed operations exists.
    fn ensure_index(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Drop everything written to the target collection.
    fn purge(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Perform one timed call. The harness measures wall time around it.
    fn invoke(
        &self,
        operation: Self::Operation,
        worker_id: u64,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Names accepted for `--op` by the given collaborator, in declaration order.
#[must_use]
pub fn operation_names<O: Operations>() -> &'static [&'static str] {
    <O::Operation as strum::VariantNames>::VARIANTS
}
