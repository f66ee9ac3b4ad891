use async_trait::async_trait;
use exsjob::{
    Job,
    error::JobError,
};
use std::{
    io,
    process::{
        ExitStatus,
        Stdio,
    },
};
use tokio::{
    io::AsyncRead,
    process::{
        Child,
        Command,
    },
    sync::mpsc,
};

use crate::{
    event::{
        JobEvent,
        ProgressLine,
    },
    output::{
        LineSplitter,
        MergedOutput,
        Source,
    },
};
use super::*;

impl Progress {
    pub fn new(job: &Job, sender: mpsc::Sender<JobEvent>) -> Self {
        Self {
            id: job.id(),
            command: job.command().to_string(),
            sender,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Record the line as the job's latest progress and forward it.
    pub async fn line(&self, job: &mut Job, line: String) {
        job.set_progress(line.clone());
        let event = JobEvent::Progress(ProgressLine {
            id: self.id,
            command: self.command.clone(),
            line,
        });
        if self.sender.send(event).await.is_err() {
            log::debug!("progress for job {} dropped as nothing is listening", self.id);
        }
    }
}

impl CommandExecutor {
    pub fn new(capture: bool) -> Self {
        Self { capture }
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    async fn run_silent(&self, job: &mut Job) -> Result<(), JobError> {
        let mut command = Command::from(&*job);
        command
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        log::trace!("job {} will run: {command:?}", job.id());
        let mut child = command.spawn()
            .map_err(|e| JobError::launch(job.command(), e))?;
        log::trace!("waiting for child {:?}", child.id());
        let status = child.wait().await
            .map_err(|e| JobError::stdio(job.command(), e))?;
        check_status(job, status)
    }

    async fn run_streaming(
        &self,
        job: &mut Job,
        progress: &Progress,
    ) -> Result<(), JobError> {
        let mut command = Command::from(&*job);
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        log::trace!("job {} will run with output: {command:?}", job.id());
        let mut child = command.spawn()
            .map_err(|e| JobError::launch(job.command(), e))?;
        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                reap(&mut child).await;
                return Err(JobError::launch(
                    job.command(),
                    io::Error::new(io::ErrorKind::BrokenPipe, "output pipes were not set up"),
                ));
            }
        };
        // the pipes are dropped by relay, so a child still writing after a
        // read failure gets a broken pipe instead of blocking the wait.
        let relayed = relay(job, progress, MergedOutput::new(stdout, stderr)).await;
        log::trace!("waiting for child {:?}", child.id());
        let status = child.wait().await
            .map_err(|e| JobError::stdio(job.command(), e))?;
        relayed?;
        check_status(job, status)
    }
}

async fn relay<O, E>(
    job: &mut Job,
    progress: &Progress,
    mut merged: MergedOutput<O, E>,
) -> Result<(), JobError>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout_lines = LineSplitter::new();
    let mut stderr_lines = LineSplitter::new();
    let result = loop {
        match merged.next_chunk().await {
            Ok(Some(chunk)) => {
                job.record_output(&chunk.bytes);
                let lines = match chunk.source {
                    Source::Stdout => stdout_lines.push(&chunk.bytes),
                    Source::Stderr => stderr_lines.push(&chunk.bytes),
                };
                for line in lines {
                    progress.line(job, line).await;
                }
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(JobError::stdio(job.command(), e)),
        }
    };
    for line in [stdout_lines.finish(), stderr_lines.finish()].into_iter().flatten() {
        progress.line(job, line).await;
    }
    result
}

async fn reap(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        log::debug!("unable to kill child {:?}: {e}", child.id());
    }
    if let Err(e) = child.wait().await {
        log::debug!("unable to wait for child: {e}");
    }
}

fn check_status(job: &Job, status: ExitStatus) -> Result<(), JobError> {
    log::trace!("job {} exit with {status}", job.id());
    if status.success() {
        Ok(())
    } else {
        Err(JobError::non_zero(job.command(), status))
    }
}

#[async_trait]
impl traits::Executor for CommandExecutor {
    async fn execute(
        &self,
        job: &mut Job,
        progress: &Progress,
    ) -> Result<(), JobError> {
        if self.capture {
            self.run_streaming(job, progress).await
        } else {
            self.run_silent(job).await
        }
    }
}
