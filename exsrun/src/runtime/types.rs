use tokio::runtime::Handle;

use crate::runner::Runner;

pub struct Builder<EX> {
    pub(super) executor: Option<EX>,
    pub(super) cpus: usize,
    pub(super) concurrent: bool,
}

pub struct Runtime<EX> {
    pub(super) runtime: Option<tokio::runtime::Runtime>,
    pub(super) handle: Handle,
    pub(super) runner: Runner<EX>,
}
