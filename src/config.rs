/// Construction settings for a `Deque`.
///
/// # Examples
///
/// ```
/// use linked_deque::{Deque, DequeConfig};
///
/// let d: Deque<u32> = Deque::with_config(DequeConfig::default().with_capacity(8)).unwrap();
/// assert_eq!(8, d.len_freelist());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DequeConfig {
    /// Number of node slots allocated up front and placed on the free
    /// list. Zero defers all allocation to the first push.
    pub capacity: usize,
}

impl DequeConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
