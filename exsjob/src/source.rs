//! Construction of the job list, either from a single command line or
//! from a newline delimited command file.

use std::{
    fs,
    path::Path,
};

use crate::{
    error::SourceError,
    job::Job,
};

/// Exactly one job from the trailing command line tokens.
pub fn from_args<I, S>(args: I) -> Result<Vec<Job>, SourceError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().peekable();
    if args.peek().is_none() {
        return Err(SourceError::Empty);
    }
    Ok(vec![Job::new(0, args)?])
}

/// One job per non-blank line, tokenized on whitespace.
pub fn from_str(s: &str) -> Result<Vec<Job>, SourceError> {
    let jobs = s.trim_matches('\n')
        .lines()
        .map(str::split_whitespace)
        .filter_map(|mut tokens| tokens.next().map(|first| (first, tokens)))
        .enumerate()
        .map(|(id, (first, rest))| Job::new(id, std::iter::once(first).chain(rest)))
        .collect::<Result<Vec<_>, _>>()?;
    if jobs.is_empty() {
        Err(SourceError::Empty)
    } else {
        Ok(jobs)
    }
}

pub fn from_file(path: impl AsRef<Path>) -> Result<Vec<Job>, SourceError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|source| SourceError::File {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("loading jobs from {}", path.display());
    from_str(&contents)
}
