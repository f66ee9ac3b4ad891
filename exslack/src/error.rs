use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to post to the webhook: {0}")]
    Notify(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    NotifyStatus(reqwest::StatusCode),
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to locate the home directory")]
    NoHome,
    #[error("config file {0} was not found")]
    NotFound(String),
    #[error("can't read config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config file is not valid: {0} must be set")]
    Missing(&'static str),
}
