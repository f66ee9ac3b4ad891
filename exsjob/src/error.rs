use std::{
    io,
    path::PathBuf,
    process::ExitStatus,
};
use thiserror::Error;

/// The broad classification of a terminal job error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The process was never started.
    Launch,
    /// The process started but did not finish cleanly.
    Runtime,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum JobError {
    #[error("unable to launch {command}: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("{command} terminated with {status}")]
    NonZero {
        command: String,
        status: ExitStatus,
    },
    #[error("unable to read output of {command}: {source}")]
    Stdio {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl JobError {
    pub fn launch(command: impl Into<String>, source: io::Error) -> Self {
        Self::Launch { command: command.into(), source }
    }

    pub fn non_zero(command: impl Into<String>, status: ExitStatus) -> Self {
        Self::NonZero { command: command.into(), status }
    }

    pub fn stdio(command: impl Into<String>, source: io::Error) -> Self {
        Self::Stdio { command: command.into(), source }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Launch { .. } => FailureKind::Launch,
            Self::NonZero { .. } | Self::Stdio { .. } => FailureKind::Runtime,
        }
    }

    /// The exit code of the process, if it exited with one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZero { status, .. } => status.code(),
            _ => None,
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("command file {} could not be read: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("command is not defined")]
    Empty,
    #[error("job {0} has no command")]
    NoCommand(usize),
}
