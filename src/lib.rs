//! A double-ended queue (deque) supporting push, pop and peek at
//! both the front and the back.
//!
//! Internally, the deque is a doubly linked chain of nodes. The nodes
//! live in a `Vec` owned by the deque and refer to their neighbors by
//! index, so there are no raw pointers and no reference counting.
//!
//! As nodes are popped, their slots in the `Vec` are put on an
//! internal free list. This free list is used when values are pushed
//! before the internal `Vec` is expanded.
//!
//! Every operation that may allocate returns a [`DequeError`] instead
//! of aborting, and every operation that reads an end of the deque
//! returns a [`DequeError`] when the deque is empty.

mod config;
mod deque;
mod error;
mod node;

pub use crate::config::DequeConfig;
pub use crate::deque::Deque;
pub use crate::error::{DequeError, End};
