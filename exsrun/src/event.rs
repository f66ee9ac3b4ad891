use exsjob::Job;

/// A single line observed on the combined output of a running job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressLine {
    pub id: usize,
    pub command: String,
    pub line: String,
}

/// Everything a running job reports back to the event loop.  A job
/// emits zero or more `Progress` events followed by exactly one `Done`,
/// which also hands ownership of the job back.
#[derive(Debug)]
pub enum JobEvent {
    Progress(ProgressLine),
    Done(Job),
}

/// How a batch of jobs was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Concurrent,
}

impl From<bool> for Mode {
    fn from(concurrent: bool) -> Self {
        if concurrent {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

impl ProgressLine {
    /// The text to display, prefixed by the command when output from
    /// several jobs may interleave.
    pub fn display(&self, mode: Mode) -> String {
        match mode {
            Mode::Concurrent => format!("{}:\t{}", self.command, self.line),
            Mode::Sequential => self.line.clone(),
        }
    }
}
