//! Error types for the huffpack library.

use std::fmt;
use std::io;

/// Result type alias for huffpack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compressing or decompressing.
#[derive(Debug)]
pub enum Error {
    /// Opening, reading or writing one of the files failed.
    Io(io::Error),
    /// There are no bytes to compress.
    EmptyInput,
    /// Input is larger than the 32-bit size fields of the container allow.
    InputTooLarge {
        /// Input length in bytes.
        len: u64,
    },
    /// The archive does not start with the expected magic number.
    BadMagic {
        /// Magic value found in the file.
        found: u32,
    },
    /// Header or frequency table is truncated or inconsistent.
    Format(String),
    /// A buffer for the decoded output could not be allocated.
    ResourceExhausted {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The priority queue was asked to hold more nodes than it was sized for.
    QueueCapacity {
        /// Fixed capacity of the queue.
        capacity: usize,
    },
    /// The payload walked off a missing tree edge.
    StreamDesync {
        /// Number of bytes decoded before the bad edge.
        decoded: u64,
    },
}

impl Error {
    /// Returns true for errors caused by a malformed archive.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::BadMagic { .. } | Error::Format(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::EmptyInput => write!(f, "Input is empty"),
            Error::InputTooLarge { len } => {
                write!(
                    f,
                    "Input of {} bytes exceeds maximum size {}",
                    len,
                    u32::MAX
                )
            }
            Error::BadMagic { found } => {
                write!(f, "Invalid file format: bad magic number {:#010x}", found)
            }
            Error::Format(msg) => write!(f, "Invalid file format: {}", msg),
            Error::ResourceExhausted { requested } => {
                write!(f, "Failed to allocate {} bytes", requested)
            }
            Error::QueueCapacity { capacity } => {
                write!(f, "Priority queue overflow (capacity {})", capacity)
            }
            Error::StreamDesync { decoded } => {
                write!(
                    f,
                    "Invalid bit sequence after {} decoded bytes",
                    decoded
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
