use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::result;

/// A type alias for `Result<T, keyspan::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when building or querying a byte-span index.
///
/// Every variant is a deterministic function of the call arguments and file
/// contents, so none of them is worth retrying without changing the input.
/// The one absence case that is *not* an error is a non-strict fetch miss,
/// which returns an empty result set instead.
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading the source file or reading
    /// or writing the index artifact. A missing source or index file shows
    /// up here with `io::ErrorKind::NotFound`.
    Io(io::Error),
    /// The operation was invoked with invalid parameters, e.g. an index
    /// path equal to the source path. Raised before any I/O is attempted.
    Config(String),
    /// A row has fewer fields than the requested key column, so no key can
    /// be extracted from it.
    MalformedRow {
        /// The physical line number of the bad row (1-based, counting
        /// skipped header lines).
        line: u64,
        /// The number of fields the row actually has.
        len: usize,
        /// The 1-based key column that was requested.
        key_column: usize,
    },
    /// The index artifact exists but fails schema validation: it is not
    /// valid JSON, or the `delimiter`/`keys` fields are absent or
    /// malformed.
    CorruptIndex {
        /// The path of the artifact that failed to load.
        path: PathBuf,
        /// What the parser rejected.
        msg: String,
    },
    /// A strict fetch was made for a key that is not present in the index.
    KeyNotFound(String),
}

impl Error {
    /// Returns true if and only if this is an I/O error caused by a missing
    /// file (the source file or the index artifact).
    pub fn is_not_found(&self) -> bool {
        match *self {
            Error::Io(ref err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Config(ref msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            Error::MalformedRow { line, len, key_column } => {
                write!(
                    f,
                    "malformed row on line {}: found {} fields, but the key \
                     column is {}",
                    line, len, key_column
                )
            }
            Error::CorruptIndex { ref path, ref msg } => {
                write!(
                    f,
                    "corrupt index artifact {}: {}",
                    path.display(),
                    msg
                )
            }
            Error::KeyNotFound(ref key) => {
                write!(f, "key {:?} not present in the index", key)
            }
        }
    }
}
