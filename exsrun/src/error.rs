use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("reporting failed: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("event channel closed after {received} of {expected} job(s) completed")]
    ChannelClosed {
        expected: usize,
        received: usize,
    },
    #[error("job {0} completed without a start or elapsed time")]
    Incomplete(usize),
    #[error("executor was not provided")]
    MissingExecutor,
    #[error(transparent)]
    Runtime(#[from] std::io::Error),
}

impl RunnerError {
    pub(crate) fn sink<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Sink(Box::new(error))
    }
}
