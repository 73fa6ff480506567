use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::FuzzError;

/// Lazy, line-at-a-time wordlist source. Nothing is buffered beyond the
/// reader's own buffer, so the scheduler's gate throttles reading too.
pub struct Wordlist<R> {
    reader: R,
    path: PathBuf,
    buf: Vec<u8>,
}

impl Wordlist<BufReader<File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, FuzzError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await.map_err(|source| FuzzError::Wordlist {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            reader: BufReader::new(file),
            path,
            buf: Vec::new(),
        })
    }
}

impl<R: AsyncBufRead + Unpin> Wordlist<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            path: PathBuf::from("<memory>"),
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of input.
    /// Every line is a literal word; blank lines are not skipped.
    pub async fn next_word(&mut self) -> Result<Option<String>, FuzzError> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(|source| FuzzError::Wordlist {
                path: self.path.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}
