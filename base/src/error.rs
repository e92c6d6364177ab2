// This file is part of phpfina-rs.
// SPDX-License-Identifier: MIT

//! A small typed error, in the shape spec.md §7 describes: a machine
//! discriminable `ErrorKind` plus a human-readable message and (optionally)
//! the error that caused this one.

use std::fmt;

/// Error kind. Exactly the eight kinds spec.md §7 names; nothing here is
/// a generic "unknown" bucket because every failure mode in this core is
/// one of these eight.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ErrorKind {
    /// A precondition in spec.md §4 was violated (bad type, out-of-bounds
    /// integer, malformed path, bad step/interval ratio).
    InvalidArgument,
    /// Required sibling file (`.meta` or `.dat`) not present.
    FileMissing,
    /// File exceeds the configured size cap.
    FileTooLarge,
    /// `.meta` shorter than 16 bytes or otherwise unparsable.
    CorruptMeta,
    /// Short read while streaming `.dat`.
    CorruptData,
    /// Request lies outside the feed's `[start_time, end_time)` or exceeds
    /// `max_size`.
    OutOfRange,
    /// A daily chunk contains samples past its day boundary; indicates an
    /// invariant breach, not a user mistake.
    ChunkBoundaryViolation,
    /// Underlying filesystem or mmap failure.
    IoError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::FileMissing => "file missing",
            ErrorKind::FileTooLarge => "file too large",
            ErrorKind::CorruptMeta => "corrupt meta",
            ErrorKind::CorruptData => "corrupt data",
            ErrorKind::OutOfRange => "out of range",
            ErrorKind::ChunkBoundaryViolation => "chunk boundary violation",
            ErrorKind::IoError => "io error",
        };
        f.write_str(s)
    }
}

/// The error type used throughout `base` and `store`.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    msg: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            msg: None,
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[doc(hidden)]
    pub fn with_message(mut self, msg: String) -> Self {
        self.msg = Some(msg);
        self
    }

    #[doc(hidden)]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.msg, &self.source) {
            (Some(m), Some(s)) => write!(f, "{}: {m}: {s}", self.kind),
            (Some(m), None) => write!(f, "{}: {m}", self.kind),
            (None, Some(s)) => write!(f, "{}: {s}", self.kind),
            (None, None) => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(ErrorKind::IoError).with_source(e)
    }
}

/// Extension methods for tagging a foreign `Result` with an [`ErrorKind`]
/// in one call, e.g. `std::fs::metadata(p).err_kind(ErrorKind::IoError)?`.
pub trait ResultExt<T> {
    fn err_kind(self, k: ErrorKind) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn err_kind(self, k: ErrorKind) -> Result<T, Error> {
        self.map_err(|e| Error::new(k).with_source(e))
    }
}

/// Builds an [`Error`] of the given kind, optionally with a message and/or
/// a wrapped source error.
///
/// ```ignore
/// err!(InvalidArgument, msg("feed_id must be a positive integer"))
/// err!(IoError, source(io_err))
/// err!(CorruptMeta, msg("{} is only {} bytes", path.display(), len), source(io_err))
/// ```
#[macro_export]
macro_rules! err {
    ($kind:ident) => {
        $crate::Error::new($crate::ErrorKind::$kind)
    };
    ($kind:ident, msg($($arg:tt)*)) => {
        $crate::Error::new($crate::ErrorKind::$kind).with_message(format!($($arg)*))
    };
    ($kind:ident, source($src:expr)) => {
        $crate::Error::new($crate::ErrorKind::$kind).with_source($src)
    };
    ($kind:ident, msg($($arg:tt)*), source($src:expr)) => {
        $crate::Error::new($crate::ErrorKind::$kind)
            .with_message(format!($($arg)*))
            .with_source($src)
    };
}

/// Like [`err!`], but returns immediately with `Err(...)`.
#[macro_export]
macro_rules! bail {
    ($($args:tt)*) => {
        return Err($crate::err!($($args)*))
    };
}
