pub mod error;
pub mod event;
pub mod executor;
pub mod output;
pub mod runner;
pub mod runtime;
pub mod sink;
