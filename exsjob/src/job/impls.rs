use chrono::{
    DateTime,
    Local,
    TimeDelta,
};
use std::{
    fmt,
    time::{
        Duration,
        Instant,
    },
};

use crate::{
    error::{
        JobError,
        SourceError,
    },
    report::build_text,
};
use super::*;

impl Stamp {
    fn now() -> Self {
        Self {
            wall: Local::now(),
            instant: Instant::now(),
        }
    }
}

impl Job {
    /// Build a job from the full command line; the first token is the
    /// executable, the remainder are passed verbatim as its arguments.
    pub fn new<I, S>(id: usize, tokens: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = tokens.into_iter().map(Into::into);
        let command = tokens.next()
            .filter(|command: &String| !command.is_empty())
            .ok_or(SourceError::NoCommand(id))?;
        Ok(Self {
            id,
            command,
            args: tokens.collect(),
            start: None,
            end: None,
            elapsed: None,
            output: Vec::new(),
            error: None,
            progress: None,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn full_command(&self) -> Vec<&str> {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    pub fn start(&self) -> Option<&DateTime<Local>> {
        self.start.as_ref().map(|stamp| &stamp.wall)
    }

    pub fn end(&self) -> Option<&DateTime<Local>> {
        self.end.as_ref()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    pub fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub fn state(&self) -> JobState {
        match (&self.start, &self.elapsed) {
            (None, _) => JobState::Pending,
            (Some(_), None) => JobState::Running,
            (Some(_), Some(_)) => JobState::Done,
        }
    }

    /// Record the dispatch time.  Only the first call has any effect.
    pub fn stamp_start(&mut self) {
        if self.start.is_none() {
            self.start = Some(Stamp::now());
        } else {
            log::warn!("job {} already has a start time; ignoring", self.id);
        }
    }

    pub fn record_output(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    pub fn set_progress(&mut self, line: impl Into<String>) {
        self.progress = Some(line.into());
    }

    /// Seal the job with its terminal outcome, deriving `end` and
    /// `elapsed` from the recorded start.  Only the first call has any
    /// effect.
    pub fn finish(&mut self, error: Option<JobError>) {
        if self.elapsed.is_some() {
            log::warn!("job {} has already finished; ignoring", self.id);
            return;
        }
        let start = *self.start.get_or_insert_with(Stamp::now);
        let elapsed = start.instant.elapsed();
        self.end = Some(TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| start.wall.checked_add_signed(delta))
            .unwrap_or(start.wall));
        self.elapsed = Some(elapsed);
        self.error = error;
    }

    /// The status line for a finished job.
    pub fn report(&self) -> Option<String> {
        match (&self.start, self.elapsed) {
            (Some(start), Some(elapsed)) => Some(build_text(
                &self.full_command(),
                &start.wall,
                elapsed,
                self.error.as_ref(),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_command().join(" "))
    }
}

#[cfg(feature = "tokio")]
mod tokio_impls {
    use std::process::Stdio;
    use tokio::process::Command;
    use super::*;

    impl From<&Job> for Command {
        fn from(job: &Job) -> Self {
            let mut cmd = Command::new(&job.command);
            cmd.args(&job.args)
                .stdin(Stdio::null());
            cmd
        }
    }
}
