use exsjob::Job;
use std::num::NonZeroUsize;
use tokio::runtime;

use crate::{
    error::RunnerError,
    executor::traits,
    runner::Runner,
    sink::Sink,
};

use super::*;

/// The number of scheduler threads to use: the requested count when it
/// is below what the host offers, otherwise everything available.
pub fn worker_threads(requested: usize, available: usize) -> usize {
    if requested == 0 || requested >= available {
        available
    } else {
        requested
    }
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl<EX> From<EX> for Builder<EX>
where
    EX: traits::Executor + Send + Sync + Clone + 'static,
{
    fn from(value: EX) -> Self {
        Self::new()
            .executor(value)
    }
}

impl<EX> Default for Builder<EX>
where
    EX: traits::Executor + Send + Sync + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<EX> Builder<EX>
where
    EX: traits::Executor + Send + Sync + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            executor: None,
            cpus: 1,
            concurrent: false,
        }
    }

    pub fn executor(mut self, value: EX) -> Self {
        self.executor = Some(value);
        self
    }

    /// Cap on the threads of the scheduler; this does not bound how many
    /// jobs run at once.  Zero means every available CPU.
    pub fn cpus(mut self, value: usize) -> Self {
        self.cpus = value;
        self
    }

    pub fn concurrent(mut self, value: bool) -> Self {
        self.concurrent = value;
        self
    }

    pub fn build(self) -> Result<Runtime<EX>, RunnerError> {
        let executor = self.executor.ok_or(RunnerError::MissingExecutor)?;
        let workers = worker_threads(self.cpus, available_parallelism());
        log::debug!("building runtime with {workers} worker thread(s)");
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .enable_io()
            .build()?;
        let handle = runtime.handle().clone();
        Ok(Runtime {
            runner: Runner::new(executor, handle.clone(), self.concurrent),
            runtime: Some(runtime),
            handle,
        })
    }

    pub fn build_with_handle(
        self,
        handle: runtime::Handle,
    ) -> Result<Runtime<EX>, RunnerError> {
        Ok(Runtime {
            runner: Runner::new(
                self.executor.ok_or(RunnerError::MissingExecutor)?,
                handle.clone(),
                self.concurrent,
            ),
            runtime: None,
            handle,
        })
    }
}

impl<EX> Runtime<EX>
where
    EX: traits::Executor + Send + Sync + Clone + 'static,
{
    pub fn handle(&self) -> &runtime::Handle {
        &self.handle
    }

    pub fn runner(&self) -> &Runner<EX> {
        &self.runner
    }

    /// Block on running every job to completion, returning the jobs in
    /// the order they were reported.
    pub fn run<S>(&self, jobs: Vec<Job>, sink: &S) -> Result<Vec<Job>, RunnerError>
    where
        S: Sink + Sync,
    {
        let task = async {
            let completed = self.runner.run(jobs, sink).await?;
            self.runner.shutdown().await;
            Ok::<_, RunnerError>(completed)
        };
        match &self.runtime {
            Some(runtime) => runtime.block_on(task),
            None => self.handle.block_on(task),
        }
    }
}
