use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A half-open byte range `[start, end)` into the source file.
///
/// Offsets are positions in the file's on-disk byte representation, never
/// character offsets, so multi-byte sequences in the data cannot skew them.
/// Spans are consumed via seek + bounded read.
pub type Span = (u64, u64);

/// Returns the default index path for a source file: the source path with
/// `.idx` appended (`data.tsv` becomes `data.tsv.idx`).
pub fn default_index_path<P: AsRef<Path>>(source: P) -> PathBuf {
    let mut path = source.as_ref().as_os_str().to_os_string();
    path.push(".idx");
    PathBuf::from(path)
}

/// The persisted index artifact: the delimiter the source was tokenized
/// with, plus a map from key value to the byte span holding that key's rows.
///
/// The artifact is created wholesale by one build and is immutable
/// thereafter. On disk it is a single compact JSON document:
///
/// ```text
/// {"delimiter":"\t","keys":{"A010":[0,24],"A02":[24,36]}}
/// ```
///
/// Keys are serialized in sorted order, so the bytes written for a given
/// build are deterministic. The recorded delimiter is the authority on how
/// the source was tokenized: readers parse fetched spans with it rather
/// than with a delimiter of their own.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct FileIndex {
    delimiter: char,
    keys: BTreeMap<String, Span>,
}

impl FileIndex {
    pub(crate) fn new(delimiter: char) -> FileIndex {
        FileIndex { delimiter, keys: BTreeMap::new() }
    }

    /// Records the span for a key. A key inserted twice keeps the later
    /// span, which is what makes a non-contiguous key run a silent data
    /// hazard rather than a build failure.
    pub(crate) fn insert(&mut self, key: String, span: Span) {
        self.keys.insert(key, span);
    }

    /// Returns the single-character field delimiter recorded at build time.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the span recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Span> {
        self.keys.get(key).copied()
    }

    /// Returns an iterator over all indexed keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Returns an iterator over all `(key, span)` entries, in key order.
    pub fn spans(&self) -> impl Iterator<Item = (&str, Span)> {
        self.keys.iter().map(|(key, &span)| (key.as_str(), span))
    }

    /// Returns the number of distinct keys in the index.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if and only if the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Loads an artifact from disk.
    ///
    /// A missing file is an I/O error (`Error::is_not_found` returns true
    /// for it); a file that exists but fails schema validation is an
    /// `Error::CorruptIndex`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FileIndex> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let index: FileIndex = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| Error::CorruptIndex {
                path: path.to_path_buf(),
                msg: err.to_string(),
            })?;
        for (key, &(start, end)) in index.keys.iter() {
            if end < start {
                return Err(Error::CorruptIndex {
                    path: path.to_path_buf(),
                    msg: format!(
                        "span for key {:?} is inverted: [{}, {})",
                        key, start, end
                    ),
                });
            }
        }
        Ok(index)
    }

    /// Writes the artifact as compact JSON, creating or overwriting the
    /// file at `path`.
    pub(crate) fn write_to(&self, path: &Path) -> Result<()> {
        let mut wtr = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut wtr, self)
            .map_err(|err| Error::Io(err.into()))?;
        wtr.flush()?;
        Ok(())
    }
}
