use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// A malformed source line. `line_number` is the 1-based physical line and
/// `raw_text` is that line as written, with invalid UTF-8 replaced.
#[derive(Debug, Error)]
#[error("line {line_number}: {cause} (raw: {raw_text:?})")]
pub struct ParseError {
    pub line_number: u64,
    pub raw_text: String,
    #[source]
    pub cause: ParseCause,
}

#[derive(Debug, Error)]
pub enum ParseCause {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("malformed csv: {0}")]
    Csv(String),
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait RecordLoader {
    type Record;

    /// Read every record from `reader`, in source order.
    fn load<R: Read>(&self, reader: R) -> LoadResult<Vec<Self::Record>>;

    /// Open `path` and load it.
    fn load_path(&self, path: impl AsRef<Path>) -> LoadResult<Vec<Self::Record>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let records = self.load(BufReader::new(file))?;
        debug!(path = %path.display(), records = records.len(), "Loaded records");
        Ok(records)
    }
}
