use exsjob::Job;
use tokio::{
    runtime,
    sync::mpsc,
};
use tokio_util::task::TaskTracker;

use crate::{
    error::RunnerError,
    event::{
        JobEvent,
        Mode,
    },
    executor::{
        Progress,
        traits,
    },
    sink::Sink,
};
use super::*;

async fn run_job<EX>(
    executor: EX,
    mut job: Job,
    sender: mpsc::Sender<JobEvent>,
)
where
    EX: traits::Executor,
{
    let progress = Progress::new(&job, sender.clone());
    let result = executor.execute(&mut job, &progress).await;
    job.finish(result.err());
    match job.error() {
        Some(e) => log::debug!("job {} finished with error: {e}", job.id()),
        None => log::debug!("job {} finished", job.id()),
    }
    if sender.send(JobEvent::Done(job)).await.is_err() {
        log::debug!("completion dropped as nothing is listening");
    }
}

impl<EX> Runner<EX>
where
    EX: traits::Executor + Send + Sync + Clone + 'static,
{
    pub fn new(
        executor: EX,
        rt_handle: runtime::Handle,
        mode: impl Into<Mode>,
    ) -> Self {
        let mode = mode.into();
        log::info!("setting up runner in {mode:?} mode");
        Self {
            executor,
            rt_handle,
            mode,
            task_tracker: TaskTracker::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Start every job as its own task.  All start times are stamped
    /// before the first job is spawned, so they reflect the dispatch of
    /// the batch rather than when each process actually got scheduled.
    pub fn dispatch(&self, mut jobs: Vec<Job>) -> Batch {
        let size = jobs.len();
        let (sender, receiver) = mpsc::channel(size.max(1));
        jobs.iter_mut().for_each(Job::stamp_start);
        for job in jobs {
            log::debug!("dispatching job {}: {job}", job.id());
            self.rt_handle.spawn(self.task_tracker.track_future(run_job(
                self.executor.clone(),
                job,
                sender.clone(),
            )));
        }
        Batch {
            receiver,
            size,
            mode: self.mode,
        }
    }

    /// Run all jobs according to the mode, returning them in the order
    /// they completed.
    pub async fn run<S>(
        &self,
        jobs: Vec<Job>,
        sink: &S,
    ) -> Result<Vec<Job>, RunnerError>
    where
        S: Sink + Sync,
    {
        log::debug!("running {} job(s)", jobs.len());
        match self.mode {
            Mode::Concurrent => self.dispatch(jobs).drain(sink).await,
            Mode::Sequential => {
                let mut completed = Vec::with_capacity(jobs.len());
                for job in jobs {
                    sink.started(&job).await
                        .map_err(RunnerError::sink)?;
                    completed.extend(self.dispatch(vec![job]).drain(sink).await?);
                }
                Ok(completed)
            }
        }
    }

    pub async fn shutdown(&self) {
        self.task_tracker.close();
        log::debug!("waiting for task_tracker...");
        self.task_tracker.wait().await;
        log::debug!("finished waiting for task_tracker");
    }
}

impl Batch {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The event loop: handle progress and completion events in arrival
    /// order until every job of this batch has completed.
    pub async fn drain<S>(mut self, sink: &S) -> Result<Vec<Job>, RunnerError>
    where
        S: Sink + Sync,
    {
        let mut completed = Vec::with_capacity(self.size);
        while completed.len() < self.size {
            match self.receiver.recv().await {
                Some(JobEvent::Progress(progress)) => {
                    sink.progress(&progress, self.mode).await
                        .map_err(RunnerError::sink)?;
                }
                Some(JobEvent::Done(job)) => {
                    let report = job.report()
                        .ok_or(RunnerError::Incomplete(job.id()))?;
                    sink.completed(&job, &report, self.mode).await
                        .map_err(RunnerError::sink)?;
                    completed.push(job);
                }
                None => return Err(RunnerError::ChannelClosed {
                    expected: self.size,
                    received: completed.len(),
                }),
            }
        }
        Ok(completed)
    }
}
