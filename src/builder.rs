use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};
use crate::index::{default_index_path, FileIndex};
use crate::row::Row;

/// A function applied to the raw key column value before it is used as the
/// grouping key.
type KeyTransform = Box<dyn Fn(&str) -> String>;

/// Builds a byte-span index over a delimited source file.
///
/// The builder holds the tokenization and layout options; [`index`] streams
/// the source once and writes the artifact. Options follow the source file's
/// actual shape: `delimiter` must match how fields are separated and
/// `skip_lines` must cover any header rows, or every recorded span is
/// nonsense.
///
/// [`index`]: IndexBuilder::index
///
/// # Example
///
/// ```no_run
/// use keyspan::IndexBuilder;
///
/// # fn example() -> keyspan::Result<()> {
/// let built = IndexBuilder::new()
///     .delimiter(',')
///     .skip_lines(1)
///     .index("data.csv", 2)?;
/// println!("{} keys indexed", built.keys().len());
/// # Ok(())
/// # }
/// ```
pub struct IndexBuilder {
    delimiter: char,
    skip_lines: u64,
    key_transform: Option<KeyTransform>,
    index_path: Option<PathBuf>,
}

impl Default for IndexBuilder {
    fn default() -> IndexBuilder {
        IndexBuilder::new()
    }
}

impl IndexBuilder {
    /// Creates a new builder with default options: tab delimiter, no lines
    /// skipped, no key transform, and the index written to the source path
    /// with `.idx` appended.
    pub fn new() -> IndexBuilder {
        IndexBuilder {
            delimiter: '\t',
            skip_lines: 0,
            key_transform: None,
            index_path: None,
        }
    }

    /// Sets the field delimiter.
    ///
    /// The default is `\t`. The delimiter is recorded in the artifact, so
    /// readers always re-parse spans with the delimiter the index was built
    /// with.
    pub fn delimiter(&mut self, delimiter: char) -> &mut IndexBuilder {
        self.delimiter = delimiter;
        self
    }

    /// Sets the number of physical lines to skip before indexing begins,
    /// typically to pass over header rows. Skipped bytes belong to no span.
    ///
    /// The default is `0`.
    pub fn skip_lines(&mut self, skip_lines: u64) -> &mut IndexBuilder {
        self.skip_lines = skip_lines;
        self
    }

    /// Sets a transform applied to the raw key column value before it is
    /// used as the grouping key, e.g. to index by a coarser category
    /// derived from the key.
    ///
    /// The contiguity requirement applies to the *transformed* key: source
    /// rows must already be grouped by the transform's output, or spans for
    /// a recurring transformed key silently overwrite one another.
    pub fn key_transform<F>(&mut self, transform: F) -> &mut IndexBuilder
    where
        F: Fn(&str) -> String + 'static,
    {
        self.key_transform = Some(Box::new(transform));
        self
    }

    /// Sets an explicit path for the index artifact instead of the default
    /// derived from the source path. Pointing separate builds at separate
    /// paths is how multiple independent indices over one source are made.
    pub fn index_path<P: AsRef<Path>>(&mut self, path: P) -> &mut IndexBuilder {
        self.index_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Streams the source file once, partitions it into contiguous byte
    /// spans keyed by the value in `key_column` (1-based), and writes the
    /// artifact. Returns a handle to the completed build.
    ///
    /// Offsets are tracked as the cumulative count of bytes consumed per
    /// physical line, so they are exact positions in the file's on-disk
    /// byte representation regardless of buffering or multi-byte content.
    ///
    /// # Errors
    ///
    /// Fails with `Error::Config` before any I/O if `key_column` is zero or
    /// the index path resolves to the source path itself; with
    /// `Error::MalformedRow` if any row has fewer fields than `key_column`;
    /// and with `Error::Io` if the source is unreadable or the index path
    /// unwritable.
    pub fn index<P: AsRef<Path>>(
        &self,
        source: P,
        key_column: usize,
    ) -> Result<BuiltIndex> {
        let source = source.as_ref();
        if key_column == 0 {
            return Err(Error::Config(
                "key column is 1-based and must be at least 1".to_string(),
            ));
        }
        let index_path = match self.index_path {
            Some(ref path) => path.clone(),
            None => default_index_path(source),
        };
        if index_path == source {
            return Err(Error::Config(format!(
                "index path must differ from the source path ({})",
                source.display()
            )));
        }

        let mut rdr = BufReader::new(File::open(source)?);
        let mut delim_buf = [0u8; 4];
        let delimiter = self.delimiter.encode_utf8(&mut delim_buf).as_bytes();

        let mut index = FileIndex::new(self.delimiter);
        let mut seen: Vec<String> = Vec::new();
        let mut line = Vec::new();
        let mut pos: u64 = 0;
        let mut lineno: u64 = 0;

        for _ in 0..self.skip_lines {
            line.clear();
            let n = rdr.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            pos += n as u64;
            lineno += 1;
        }

        // The running span. `last_line_end` trails `pos` by one line so
        // that a key change can close the previous span at the boundary
        // between the two lines.
        let mut span_start = pos;
        let mut last_line_end = pos;
        let mut last_key: Option<String> = None;

        loop {
            line.clear();
            let n = rdr.read_until(b'\n', &mut line)?;
            if n == 0 {
                break;
            }
            lineno += 1;
            pos += n as u64;

            let row = Row::parse(trim_terminator(&line), delimiter);
            if row.len() < key_column {
                return Err(Error::MalformedRow {
                    line: lineno,
                    len: row.len(),
                    key_column,
                });
            }
            let raw = &row[key_column - 1];
            let key = match self.key_transform {
                Some(ref transform) => transform(raw),
                None => raw.to_string(),
            };

            if let Some(prev) = last_key.take() {
                if prev != key {
                    if !seen.contains(&prev) {
                        seen.push(prev.clone());
                    }
                    index.insert(prev, (span_start, last_line_end));
                    span_start = last_line_end;
                }
            }
            last_key = Some(key);
            last_line_end = pos;
        }

        // Close the final open span. This also covers a last line with no
        // trailing terminator, since `pos` counts exactly the bytes read.
        if let Some(prev) = last_key {
            if !seen.contains(&prev) {
                seen.push(prev.clone());
            }
            index.insert(prev, (span_start, last_line_end));
        }

        index.write_to(&index_path)?;
        debug!(
            "indexed {}: {} keys over {} bytes, artifact at {}",
            source.display(),
            index.len(),
            pos,
            index_path.display()
        );
        Ok(BuiltIndex { index_path, keys: seen, index })
    }
}

fn trim_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// The in-memory result of a completed build, for caller diagnostics.
///
/// This is a read accessor over the build that just ran, not a re-read of
/// any file.
#[derive(Debug)]
pub struct BuiltIndex {
    index_path: PathBuf,
    keys: Vec<String>,
    index: FileIndex,
}

impl BuiltIndex {
    /// Returns the path the artifact was written to.
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Returns the distinct keys observed during the build, in first-seen
    /// order. Useful for printing a few sample keys so a caller can verify
    /// their delimiter and column choices parsed sensibly.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the index that was just written.
    pub fn index(&self) -> &FileIndex {
        &self.index
    }
}
