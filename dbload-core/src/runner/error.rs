pub type Result<T> = std::result::Result<T, Error>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("`threads` must be a positive integer")]
    InvalidThreads,

    #[error("`min` ({min}s) must not be greater than `max` ({max}s)")]
    InvalidSleepBounds { min: u64, max: u64 },

    #[error("unknown operation `{name}` (available: {available})")]
    UnknownOperation { name: String, available: String },

    #[error("`duration` and `iterations` are both 0; the run would never finish")]
    Unbounded,

    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn collaborator<E>(stage: &'static str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Collaborator {
            stage,
            source: Box::new(err),
        }
    }

    /// True for errors caused by the configuration rather than by the database.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidThreads
                | Self::InvalidSleepBounds { .. }
                | Self::UnknownOperation { .. }
                | Self::Unbounded
        )
    }
}
