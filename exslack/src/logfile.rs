//! The file sink for progress, captured output and reports, optionally
//! rotated by size.

use chrono::{
    DateTime,
    Local,
    TimeZone,
};
use std::{
    fmt::Display,
    fs::{
        self,
        File,
        OpenOptions,
    },
    io::{
        self,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
    time::{
        Duration,
        SystemTime,
    },
};

use crate::config::Config;

pub const LOG_PREFIX: &str = "exslack: ";
pub const LOG_FILE_STEM: &str = "exslack";
const BACKUP_TIMESTAMP: &str = "%Y-%m-%dT%H-%M-%S%.9f";
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Prefix and timestamp a line of text for the logs.  A newline is
/// only appended when the text does not already end with one.
pub fn format_line<Tz>(now: &DateTime<Tz>, text: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let newline = if text.ends_with('\n') { "" } else { "\n" };
    format!("{LOG_PREFIX}{} {text}{newline}", now.format("%Y/%m/%d %H:%M:%S"))
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rotation {
    pub max_size: u64,
    pub max_backups: usize,
    pub max_age: Duration,
}

impl From<&Config> for Rotation {
    fn from(config: &Config) -> Self {
        Self {
            max_size: config.max_size.saturating_mul(1024 * 1024),
            max_backups: config.max_backups as usize,
            max_age: DAY * config.max_age,
        }
    }
}

pub struct LogFile {
    path: PathBuf,
    file: File,
    size: u64,
    rotation: Option<Rotation>,
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

impl LogFile {
    /// Append to the file at `path`, never rotating it.
    pub fn append(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self { path, file, size, rotation: None })
    }

    /// `exslack.log` under `dir`, rotated once it grows past the limit.
    pub fn rotating(dir: impl AsRef<Path>, rotation: Rotation) -> io::Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        let mut log_file = Self::append(dir.as_ref().join(format!("{LOG_FILE_STEM}.log")))?;
        log_file.rotation = Some(rotation);
        Ok(log_file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        let line = format_line(&Local::now(), text);
        let len = line.len() as u64;
        let full = self.rotation.as_ref()
            .is_some_and(|rotation| self.size > 0 && self.size + len > rotation.max_size);
        if full {
            self.rotate()?;
        }
        self.file.write_all(line.as_bytes())?;
        self.size += len;
        Ok(())
    }

    fn backup_path(&self) -> PathBuf {
        let timestamp = Local::now().format(BACKUP_TIMESTAMP);
        let mut backup = self.path.with_file_name(format!("{LOG_FILE_STEM}-{timestamp}.log"));
        let mut n = 1;
        while backup.exists() {
            backup = self.path.with_file_name(format!("{LOG_FILE_STEM}-{timestamp}-{n}.log"));
            n += 1;
        }
        backup
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let backup = self.backup_path();
        log::debug!("rotating {} to {}", self.path.display(), backup.display());
        fs::rename(&self.path, &backup)?;
        self.file = open_append(&self.path)?;
        self.size = 0;
        self.prune()
    }

    /// Rotated files, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let prefix = format!("{LOG_FILE_STEM}-");
        let mut backups = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".log"))
            )
            .map(|path| {
                let modified = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, path)
            })
            .collect::<Vec<_>>();
        backups.sort();
        Ok(backups.into_iter()
            .rev()
            .map(|(_, path)| path)
            .collect())
    }

    fn prune(&self) -> io::Result<()> {
        let Some(rotation) = &self.rotation else {
            return Ok(());
        };
        let now = SystemTime::now();
        for (n, backup) in self.backups()?.into_iter().enumerate() {
            let expired = fs::metadata(&backup)
                .and_then(|meta| meta.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > rotation.max_age);
            if n >= rotation.max_backups || expired {
                log::debug!("removing old log file {}", backup.display());
                fs::remove_file(&backup)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use chrono::{
        FixedOffset,
        TimeZone,
    };
    use std::time::Duration;
    use super::*;

    #[test]
    fn test_format_line() {
        let now = FixedOffset::east_opt(0)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 1, 2, 15, 4, 5)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            format_line(&now, "hello"),
            "exslack: 2024/01/02 15:04:05 hello\n",
        );
        assert_eq!(
            format_line(&now, "one\ntwo\n"),
            "exslack: 2024/01/02 15:04:05 one\ntwo\n",
        );
    }

    #[test]
    fn test_rotation_from_config() {
        let config = Config {
            max_age: 7,
            max_backups: 5,
            max_size: 100,
            .. Default::default()
        };
        assert_eq!(Rotation::from(&config), Rotation {
            max_size: 100 * 1024 * 1024,
            max_backups: 5,
            max_age: Duration::from_secs(7 * 24 * 60 * 60),
        });
    }

    #[test]
    fn test_append() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.log");
        std::fs::write(&path, "existing\n")?;
        let mut log_file = LogFile::append(&path)?;
        log_file.write_line("first")?;
        log_file.write_line("second")?;
        let contents = std::fs::read_to_string(&path)?;
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with(LOG_PREFIX));
        assert!(lines[1].ends_with(" first"));
        assert!(lines[2].ends_with(" second"));
        Ok(())
    }

    #[test]
    fn test_append_terminated_text() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.log");
        let mut log_file = LogFile::append(&path)?;
        log_file.write_line("building\n")?;
        log_file.write_line("report")?;
        let contents = std::fs::read_to_string(&path)?;
        let lines = contents.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" building"));
        assert!(lines[1].ends_with(" report"));
        assert_eq!(log_file.size, contents.len() as u64);
        Ok(())
    }

    #[test]
    fn test_rotating() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut log_file = LogFile::rotating(dir.path().join("logs"), Rotation {
            max_size: 64,
            max_backups: 2,
            max_age: Duration::from_secs(3600),
        })?;
        assert_eq!(log_file.path(), dir.path().join("logs").join("exslack.log"));
        for n in 0..10 {
            log_file.write_line(&format!("line number {n}"))?;
        }
        // each line is too long to share a file with another
        assert_eq!(log_file.backups()?.len(), 2);
        let current = std::fs::read_to_string(log_file.path())?;
        assert!(current.ends_with(" line number 9\n"));
        assert_eq!(current.lines().count(), 1);
        Ok(())
    }
}
