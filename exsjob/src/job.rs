use chrono::{
    DateTime,
    Local,
};
use std::time::{
    Duration,
    Instant,
};

use crate::error::JobError;

/// One external command along with everything observed while it ran.
#[derive(Debug)]
pub struct Job {
    pub(super) id: usize,
    pub(super) command: String,
    pub(super) args: Vec<String>,
    pub(super) start: Option<Stamp>,
    pub(super) end: Option<DateTime<Local>>,
    pub(super) elapsed: Option<Duration>,
    pub(super) output: Vec<u8>,
    pub(super) error: Option<JobError>,
    pub(super) progress: Option<String>,
}

// the wall clock is kept for reporting, the monotonic instant for
// the elapsed duration.
#[derive(Clone, Copy, Debug)]
pub(super) struct Stamp {
    pub(super) wall: DateTime<Local>,
    pub(super) instant: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Done,
}

mod impls;
