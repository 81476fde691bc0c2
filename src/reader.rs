use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use log::debug;

use crate::error::{Error, Result};
use crate::index::{default_index_path, FileIndex, Span};
use crate::row::Row;

/// Queries a previously built byte-span index.
///
/// The reader loads the artifact once at construction and owns its own
/// in-memory copy of the span map; it never observes a rebuild that happens
/// after it was constructed. Each fetch performs its own seek and bounded
/// read on the source file, with no caching of rows across calls.
///
/// # Example
///
/// ```no_run
/// use keyspan::IndexReader;
///
/// # fn example() -> keyspan::Result<()> {
/// let rdr = IndexReader::from_path("data.tsv")?;
/// for row in rdr.fetch("A010")? {
///     println!("{}", &row[1]);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IndexReader {
    source: PathBuf,
    index: FileIndex,
}

impl IndexReader {
    /// Opens the index for `source` at the default artifact path (the
    /// source path with `.idx` appended).
    ///
    /// # Errors
    ///
    /// Fails with a not-found I/O error if the artifact does not exist and
    /// with `Error::CorruptIndex` if it fails schema validation.
    pub fn from_path<P: AsRef<Path>>(source: P) -> Result<IndexReader> {
        let source = source.as_ref();
        IndexReader::from_paths(source, default_index_path(source))
    }

    /// Opens the index for `source` at an explicit artifact path, e.g. one
    /// of several secondary indices built over the same source.
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        source: P,
        index_path: Q,
    ) -> Result<IndexReader> {
        let index = FileIndex::load(index_path)?;
        Ok(IndexReader { source: source.as_ref().to_path_buf(), index })
    }

    /// Fetches every row recorded for `key`, in original file order.
    ///
    /// An absent key is a normal outcome (the source simply holds no data
    /// for it) and returns an empty `Vec`. The result is eager, so it can
    /// be consumed any number of times.
    ///
    /// A fetch reads the key's whole span, however large it is. Spans are
    /// expected to be modest; bounding them is the caller's business.
    pub fn fetch(&self, key: &str) -> Result<Vec<Row>> {
        match self.index.get(key) {
            None => Ok(Vec::new()),
            Some(span) => self.read_span(key, span),
        }
    }

    /// Like [`fetch`], but an absent key fails with `Error::KeyNotFound`
    /// instead of returning an empty result.
    ///
    /// [`fetch`]: IndexReader::fetch
    pub fn fetch_strict(&self, key: &str) -> Result<Vec<Row>> {
        match self.index.get(key) {
            None => Err(Error::KeyNotFound(key.to_string())),
            Some(span) => self.read_span(key, span),
        }
    }

    /// Returns an iterator over all keys known to the index.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys()
    }

    /// Returns the field delimiter recorded in the index. The index is the
    /// authority on how the source was tokenized; the reader takes no
    /// delimiter of its own.
    pub fn delimiter(&self) -> char {
        self.index.delimiter()
    }

    fn read_span(&self, key: &str, (start, end): Span) -> Result<Vec<Row>> {
        let mut file = File::open(&self.source)?;
        file.seek(SeekFrom::Start(start))?;
        let mut block = vec![0u8; (end - start) as usize];
        file.read_exact(&mut block)?;

        let mut delim_buf = [0u8; 4];
        let delimiter =
            self.index.delimiter().encode_utf8(&mut delim_buf).as_bytes();
        let rows: Vec<Row> = block
            .lines()
            .map(|line| Row::parse(line, delimiter))
            .collect();
        debug!(
            "fetched {:?} from {}: span [{}, {}), {} rows",
            key,
            self.source.display(),
            start,
            end,
            rows.len()
        );
        Ok(rows)
    }
}
