use tokio::{
    runtime,
    sync::mpsc,
};
use tokio_util::task::TaskTracker;

use crate::event::{
    JobEvent,
    Mode,
};

/// Dispatches jobs onto the runtime and drives the reporting path as
/// their events arrive.
pub struct Runner<EX> {
    pub(super) executor: EX,
    pub(super) rt_handle: runtime::Handle,
    pub(super) mode: Mode,
    pub(super) task_tracker: TaskTracker,
}

/// The events of a set of dispatched jobs, to be drained by the event
/// loop until every job in the set has completed.
pub struct Batch {
    pub(super) receiver: mpsc::Receiver<JobEvent>,
    pub(super) size: usize,
    pub(super) mode: Mode,
}
