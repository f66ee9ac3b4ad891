use async_trait::async_trait;
use exsjob::Job;
use std::convert::Infallible;

use crate::event::{
    Mode,
    ProgressLine,
};

/// The reporting path driven by the event loop.  Any error returned
/// here is fatal to the run.
#[async_trait]
pub trait Sink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called right before a job is dispatched in sequential mode.
    async fn started(&self, _job: &Job) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn progress(
        &self,
        progress: &ProgressLine,
        mode: Mode,
    ) -> Result<(), Self::Error>;

    async fn completed(
        &self,
        job: &Job,
        report: &str,
        mode: Mode,
    ) -> Result<(), Self::Error>;
}

/// A sink that only forwards to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

#[async_trait]
impl Sink for LogSink {
    type Error = Infallible;

    async fn progress(
        &self,
        progress: &ProgressLine,
        mode: Mode,
    ) -> Result<(), Self::Error> {
        log::info!("{}", progress.display(mode));
        Ok(())
    }

    async fn completed(
        &self,
        _job: &Job,
        report: &str,
        _mode: Mode,
    ) -> Result<(), Self::Error> {
        log::info!("{report}");
        Ok(())
    }
}
