pub mod cli;
pub mod config;
pub mod error;
pub mod logfile;
pub mod notifier;
pub mod sink;
