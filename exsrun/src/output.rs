//! Incremental reading of a child's standard output and standard error
//! as one combined stream.

use std::{
    future,
    io,
};
use tokio::io::{
    AsyncRead,
    AsyncReadExt,
};

const CHUNK_SIZE: usize = 8192;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Stdout,
    Stderr,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Chunk {
    pub source: Source,
    pub bytes: Vec<u8>,
}

/// Reads whichever of the two streams has data first, until both are
/// exhausted.
pub struct MergedOutput<O, E> {
    stdout: Option<O>,
    stderr: Option<E>,
    stdout_buf: Vec<u8>,
    stderr_buf: Vec<u8>,
}

async fn read_some<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> io::Result<usize> {
    match reader {
        Some(reader) => reader.read(buf).await,
        None => future::pending().await,
    }
}

impl<O, E> MergedOutput<O, E>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    pub fn new(stdout: O, stderr: E) -> Self {
        Self {
            stdout: Some(stdout),
            stderr: Some(stderr),
            stdout_buf: vec![0; CHUNK_SIZE],
            stderr_buf: vec![0; CHUNK_SIZE],
        }
    }

    /// The next chunk in arrival order, or `None` once both streams
    /// reached end of file.
    pub async fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        loop {
            let (source, read) = tokio::select! {
                read = read_some(&mut self.stdout, &mut self.stdout_buf),
                    if self.stdout.is_some() => (Source::Stdout, read),
                read = read_some(&mut self.stderr, &mut self.stderr_buf),
                    if self.stderr.is_some() => (Source::Stderr, read),
                else => return Ok(None),
            };
            match (source, read?) {
                (Source::Stdout, 0) => self.stdout = None,
                (Source::Stderr, 0) => self.stderr = None,
                (Source::Stdout, n) => return Ok(Some(Chunk {
                    source,
                    bytes: self.stdout_buf[..n].to_vec(),
                })),
                (Source::Stderr, n) => return Ok(Some(Chunk {
                    source,
                    bytes: self.stderr_buf[..n].to_vec(),
                })),
            }
        }
    }
}

/// Splits a byte stream into lines as the bytes arrive.  The line
/// terminator and any carriage return preceding it are dropped.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

fn to_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more bytes, returning every line completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        let mut rest = bytes;
        while let Some(pos) = rest.iter().position(|b| *b == b'\n') {
            let mut line = std::mem::take(&mut self.pending);
            line.extend_from_slice(&rest[..pos]);
            lines.push(to_line(line));
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);
        lines
    }

    /// The trailing unterminated line, if any.
    pub fn finish(&mut self) -> Option<String> {
        (!self.pending.is_empty())
            .then(|| to_line(std::mem::take(&mut self.pending)))
    }
}
