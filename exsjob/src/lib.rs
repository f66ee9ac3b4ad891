pub mod error;
pub mod job;
pub mod report;
pub mod source;

pub use job::{
    Job,
    JobState,
};
