use async_trait::async_trait;
use exsjob::{
    Job,
    error::JobError,
};

use super::Progress;

#[async_trait]
pub trait Executor {
    /// Run the job to its terminal state.  The implementation is the
    /// only writer of the job while this runs; lines observed on the
    /// job's output are reported through `progress` as they arrive.
    async fn execute(
        &self,
        job: &mut Job,
        progress: &Progress,
    ) -> Result<(), JobError>;
}
