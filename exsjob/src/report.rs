use chrono::{
    DateTime,
    TimeZone,
};
use std::{
    fmt::Display,
    time::Duration,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

/// Produce the human readable status line of a finished command.
pub fn build_text<S, Tz, E>(
    command: &[S],
    start: &DateTime<Tz>,
    elapsed: Duration,
    error: Option<&E>,
) -> String
where
    S: AsRef<str>,
    Tz: TimeZone,
    Tz::Offset: Display,
    E: Display + ?Sized,
{
    let command = command.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let start = start.format(TIMESTAMP_FORMAT);
    match error {
        None => format!("Command {command} started on {start} is done in {elapsed:?}"),
        Some(error) => format!(
            "Command {command} started on {start} is done in {elapsed:?} with error, {error}"
        ),
    }
}

#[cfg(test)]
mod test {
    use chrono::{
        FixedOffset,
        TimeZone,
    };
    use std::time::Duration;
    use super::build_text;

    #[test]
    fn test_build_text_success() -> anyhow::Result<()> {
        let start = FixedOffset::east_opt(9 * 3600)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 1, 2, 15, 4, 5)
            .single()
            .expect("valid timestamp");
        let text = build_text(
            &["echo", "hello"],
            &start,
            Duration::from_millis(1503),
            None::<&std::io::Error>,
        );
        assert_eq!(
            text,
            "Command echo hello started on 2024-01-02 15:04:05.000 +09:00 is done in 1.503s",
        );
        Ok(())
    }

    #[test]
    fn test_build_text_error() -> anyhow::Result<()> {
        let start = FixedOffset::west_opt(0)
            .expect("valid offset")
            .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let error = std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file or directory",
        );
        let text = build_text(
            &["no-such-command".to_string()],
            &start,
            Duration::from_micros(250),
            Some(&error),
        );
        assert_eq!(
            text,
            "Command no-such-command started on 2024-01-02 00:00:00.000 +00:00 \
            is done in 250µs with error, No such file or directory",
        );
        Ok(())
    }
}
