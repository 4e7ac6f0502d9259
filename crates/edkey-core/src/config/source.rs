// Edkey Record Source
// Line-oriented record access over configuration resources

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

/// Errors surfaced by a record source.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// The record-reader contract consumed by the configuration loader:
/// delimiter-terminated blocks of text, end-of-input, or failure.
pub trait RecordSource {
    /// Next newline-terminated record with its terminator stripped, or
    /// `None` at end of input.
    fn next_record(&mut self) -> Result<Option<String>, ReadError>;

    /// Verbatim text up to (not including) a line equal to `end`.
    ///
    /// Returns `None` when input ends before the terminator line.
    fn read_until(&mut self, end: &str) -> Result<Option<String>, ReadError>;
}

/// Record source over any buffered reader.
#[derive(Debug)]
pub struct BlockReader<R> {
    inner: R,
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl BlockReader<BufReader<File>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> RecordSource for BlockReader<R> {
    fn next_record(&mut self) -> Result<Option<String>, ReadError> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    fn read_until(&mut self, end: &str) -> Result<Option<String>, ReadError> {
        let mut text = String::new();
        loop {
            match self.next_record()? {
                None => return Ok(None),
                Some(line) if line == end => return Ok(Some(text)),
                Some(line) => {
                    text.push_str(&line);
                    text.push('\n');
                }
            }
        }
    }
}

/// Open a named configuration resource from the current directory or,
/// failing that, the user's home directory.
pub fn open_config(name: &str) -> io::Result<BlockReader<BufReader<File>>> {
    match BlockReader::from_path(name) {
        Ok(reader) => Ok(reader),
        Err(err) => {
            let home = dirs::home_dir()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
            BlockReader::from_path(home.join(name)).map_err(|_| err)
        }
    }
}
