use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// One of the two ends of a `Deque`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Front,
    Back,
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Front => f.write_str("front"),
            End::Back => f.write_str("back"),
        }
    }
}

/// Errors returned by `Deque` operations. A failed operation never
/// leaves the deque partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DequeError {
    /// The allocator could not provide room for more nodes.
    #[error("could not allocate deque nodes: {0}")]
    AllocationFailure(#[from] TryReserveError),
    /// A pop or peek was attempted on an empty deque.
    #[error("cannot access the {end} of an empty deque")]
    EmptyDequeAccess { end: End },
}

impl DequeError {
    pub fn is_empty_access(&self) -> bool {
        matches!(self, DequeError::EmptyDequeAccess { .. })
    }
}
