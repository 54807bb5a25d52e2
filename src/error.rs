use std::collections::TryReserveError;
use std::fmt;

/// Errors reported by tree and map operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// An element comparing equal to the inserted one is already stored.
    AlreadyExists,
    /// Node storage could not grow. The tree is left untouched.
    AllocationFailed,
    /// The cursor belongs to another tree or the tree changed shape since the
    /// cursor was positioned.
    StaleCursor,
    /// The cursor moved past either end and points at no element.
    CursorExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AlreadyExists => write!(f, "element already exists"),
            Error::AllocationFailed => write!(f, "failed to allocate a tree node"),
            Error::StaleCursor => write!(f, "cursor is stale: the tree was modified"),
            Error::CursorExhausted => write!(f, "cursor does not point at an element"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::AllocationFailed
    }
}
