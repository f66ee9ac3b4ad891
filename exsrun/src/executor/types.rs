use tokio::sync::mpsc;

use crate::event::JobEvent;

/// Runs jobs as operating system processes.  With `capture` set the
/// combined output is streamed and recorded on the job, otherwise the
/// output is discarded.
#[derive(Clone, Debug, Default)]
pub struct CommandExecutor {
    pub(super) capture: bool,
}

/// The progress channel bound to one job.
pub struct Progress {
    pub(super) id: usize,
    pub(super) command: String,
    pub(super) sender: mpsc::Sender<JobEvent>,
}
