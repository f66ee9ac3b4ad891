use clap::Parser;
use exsjob::{
    Job,
    error::SourceError,
    source,
};
use std::path::PathBuf;

use crate::logfile::LogFile;

pub const NO_COMMAND: &str = "command must be received from arguments or a job file";

#[derive(Debug, Parser)]
#[command(name = "exslack", about = "Run commands and post a report of each to a chat webhook")]
pub struct Cli {
    /// Write progress, output and reports of the commands to this file.
    #[clap(long, value_name = "LOGFILE")]
    pub logfile: Option<PathBuf>,
    /// Execute commands concurrently.
    #[clap(long, action)]
    pub conc: bool,
    /// How many CPUs to use for the execution.
    #[clap(long, default_value = "1")]
    pub cpus: usize,
    /// File listing one command per line.
    #[clap(long, value_name = "FILE")]
    pub jobs: Option<PathBuf>,
    #[clap(long, value_name = "EXSLACK_CONFIG", env = "EXSLACK_CONFIG")]
    pub config: Option<PathBuf>,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// The command to run, when no job file is given.
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// The command line takes precedence over the job file.
    pub fn load_jobs(&self) -> Result<Vec<Job>, SourceError> {
        if !self.command.is_empty() {
            source::from_args(self.command.iter().cloned())
        } else if let Some(path) = &self.jobs {
            source::from_file(path)
        } else {
            Err(SourceError::Empty)
        }
    }

    /// As `load_jobs`, with any failure also recorded in the log file.
    pub fn load_jobs_logged(
        &self,
        log_file: Option<&mut LogFile>,
    ) -> Result<Vec<Job>, SourceError> {
        self.load_jobs().map_err(|e| {
            log::error!("{NO_COMMAND}: {e}");
            if let Some(log_file) = log_file {
                for text in [e.to_string().as_str(), NO_COMMAND] {
                    if let Err(write_err) = log_file.write_line(text) {
                        log::warn!("unable to write to {}: {write_err}", log_file.path().display());
                    }
                }
            }
            e
        })
    }
}
