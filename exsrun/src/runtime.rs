mod impls;
mod types;

pub use impls::worker_threads;
pub use types::*;
