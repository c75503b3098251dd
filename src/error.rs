use std::path::PathBuf;

use thiserror::Error;

/// User-visible pipeline conditions with defined handling.
///
/// [`PipelineError::DatasetNotFound`] is fatal at load time: without data
/// there is nothing to report on. [`PipelineError::EmptySelection`] is
/// recovered at the filter boundary and reported as a warning; it must never
/// reach the aggregation layer. Everything else in the crate flows through
/// `anyhow` with context.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("dataset '{name}' not found anywhere under {root:?}")]
    DatasetNotFound { name: String, root: PathBuf },
    #[error("no orders match the current filters; widen the selection")]
    EmptySelection,
}
