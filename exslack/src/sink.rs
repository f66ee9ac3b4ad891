use async_trait::async_trait;
use chrono::Local;
use exsjob::Job;
use exsrun::{
    event::{
        Mode,
        ProgressLine,
    },
    sink::Sink,
};
use parking_lot::Mutex;
use std::io::{
    self,
    Write,
};

use crate::{
    error::AppError,
    logfile::{
        LogFile,
        format_line,
    },
    notifier::Notifier,
};

pub const OUTPUT_START: &str = " == Output start == ";
pub const OUTPUT_END: &str = " == Output end == ";
pub const ALL_OUTPUT_START: &str = " == All output start == ";
pub const ALL_OUTPUT_END: &str = " == All output end == ";

/// Writes progress and reports to the console and the optional log
/// file, then delivers every report through the notifier.
pub struct AppSink<N> {
    console: Mutex<Box<dyn Write + Send>>,
    log_file: Option<Mutex<LogFile>>,
    notifier: N,
}

impl<N: Notifier + Send + Sync> AppSink<N> {
    pub fn new(notifier: N, log_file: Option<LogFile>) -> Self {
        Self {
            console: Mutex::new(Box::new(io::stdout())),
            log_file: log_file.map(Mutex::new),
            notifier,
        }
    }

    pub fn with_console(mut self, console: impl Write + Send + 'static) -> Self {
        self.console = Mutex::new(Box::new(console));
        self
    }

    /// Whether job output should be captured for this sink.
    pub fn captures_output(&self) -> bool {
        self.log_file.is_some()
    }

    fn console(&self, text: &str) -> io::Result<()> {
        let mut console = self.console.lock();
        console.write_all(format_line(&Local::now(), text).as_bytes())?;
        console.flush()
    }

    fn file(&self, lines: &[&str]) -> io::Result<()> {
        if let Some(log_file) = &self.log_file {
            let mut log_file = log_file.lock();
            for line in lines {
                log_file.write_line(line)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<N: Notifier + Send + Sync> Sink for AppSink<N> {
    type Error = AppError;

    async fn started(&self, _job: &Job) -> Result<(), Self::Error> {
        Ok(self.file(&[OUTPUT_START])?)
    }

    async fn progress(
        &self,
        progress: &ProgressLine,
        mode: Mode,
    ) -> Result<(), Self::Error> {
        let text = progress.display(mode);
        self.console(&text)?;
        Ok(self.file(&[&text])?)
    }

    async fn completed(
        &self,
        job: &Job,
        report: &str,
        mode: Mode,
    ) -> Result<(), Self::Error> {
        match mode {
            Mode::Sequential => {
                self.file(&[OUTPUT_END, report])?;
                self.console(report)?;
            }
            Mode::Concurrent => {
                self.console(report)?;
                let output = String::from_utf8_lossy(job.output());
                self.file(&[ALL_OUTPUT_START, &output, ALL_OUTPUT_END, report])?;
            }
        }
        if let Err(e) = self.notifier.notify(report).await {
            log::error!("failed to notify for job {}: {e}", job.id());
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use exsjob::Job;
    use exsrun::{
        event::{
            Mode,
            ProgressLine,
        },
        sink::Sink,
    };
    use parking_lot::Mutex;
    use std::{
        io::Write,
        sync::Arc,
    };

    use crate::{
        error::AppError,
        logfile::LogFile,
        notifier::MockNotifier,
    };
    use super::*;

    #[derive(Clone, Default)]
    struct Console(Arc<Mutex<Vec<u8>>>);

    impl Write for Console {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Console {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn finished_job(output: &[u8]) -> anyhow::Result<Job> {
        let mut job = Job::new(0, ["make", "all"])?;
        job.stamp_start();
        job.record_output(output);
        job.finish(None);
        Ok(job)
    }

    #[tokio::test]
    async fn test_sequential_without_log_file() -> anyhow::Result<()> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify()
            .withf(|text| text == "report text")
            .times(1)
            .returning(|_| Ok(()));
        let console = Console::default();
        let sink = AppSink::new(notifier, None)
            .with_console(console.clone());
        assert!(!sink.captures_output());

        let job = finished_job(b"")?;
        sink.started(&job).await?;
        sink.completed(&job, "report text", Mode::Sequential).await?;
        let lines = console.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("exslack: "));
        assert!(lines[0].ends_with(" report text"));
        Ok(())
    }

    #[tokio::test]
    async fn test_sequential_log_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("exslack.log");
        let mut notifier = MockNotifier::new();
        notifier.expect_notify()
            .times(1)
            .returning(|_| Ok(()));
        let console = Console::default();
        let sink = AppSink::new(notifier, Some(LogFile::append(&path)?))
            .with_console(console.clone());
        assert!(sink.captures_output());

        let job = finished_job(b"building\n")?;
        sink.started(&job).await?;
        sink.progress(&ProgressLine {
            id: 0,
            command: "make".into(),
            line: "building".into(),
        }, Mode::Sequential).await?;
        sink.completed(&job, "report text", Mode::Sequential).await?;

        let logged = std::fs::read_to_string(&path)?;
        let logged = logged.lines().collect::<Vec<_>>();
        assert_eq!(logged.len(), 4);
        assert!(logged[0].ends_with(OUTPUT_START));
        assert!(logged[1].ends_with(" building"));
        assert!(logged[2].ends_with(OUTPUT_END));
        assert!(logged[3].ends_with(" report text"));

        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" building"));
        assert!(lines[1].ends_with(" report text"));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_log_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("exslack.log");
        let mut notifier = MockNotifier::new();
        notifier.expect_notify()
            .times(1)
            .returning(|_| Ok(()));
        let sink = AppSink::new(notifier, Some(LogFile::append(&path)?))
            .with_console(Console::default());

        sink.progress(&ProgressLine {
            id: 0,
            command: "make".into(),
            line: "building".into(),
        }, Mode::Concurrent).await?;
        let job = finished_job(b"building\nlinked\n")?;
        sink.completed(&job, "report text", Mode::Concurrent).await?;

        let logged = std::fs::read_to_string(&path)?;
        let logged = logged.lines().collect::<Vec<_>>();
        assert_eq!(logged.len(), 6);
        assert!(logged[0].ends_with(" make:\tbuilding"));
        assert!(logged[1].ends_with(ALL_OUTPUT_START));
        assert!(logged[2].ends_with(" building"));
        assert_eq!(logged[3], "linked");
        assert!(logged[4].ends_with(ALL_OUTPUT_END));
        assert!(logged[5].ends_with(" report text"));
        Ok(())
    }

    #[tokio::test]
    async fn test_notify_failure() -> anyhow::Result<()> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify()
            .times(1)
            .returning(|_| Err(AppError::Io(std::io::ErrorKind::ConnectionRefused.into())));
        let sink = AppSink::new(notifier, None)
            .with_console(Console::default());
        let job = finished_job(b"")?;
        assert!(sink.completed(&job, "report text", Mode::Concurrent).await.is_err());
        Ok(())
    }
}
