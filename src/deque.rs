use crate::config::DequeConfig;
use crate::error::{DequeError, End};
use crate::node::{Node, Slot, Vacant};
use std::fmt;
use tracing::{debug, trace, warn};

/// A double-ended queue of doubly linked nodes.
///
/// The deque owns every node through its slot arena. Each node knows
/// the slot of its neighbor toward the front (`prev`) and toward the
/// back (`next`). Dropping the deque releases every node still linked.
pub struct Deque<T> {
    // First slot on the free list. None when the free list is empty.
    free_list: Option<usize>,
    // Slot of the front node. None exactly when the deque is empty.
    head: Option<usize>,
    // Slot of the back node. None exactly when the deque is empty.
    tail: Option<usize>,
    // The number of slots holding linked nodes.
    len_used: usize,
    // The number of slots currently on the free list.
    len_free: usize,
    slots: Vec<Slot<T>>,
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Deque::new()
    }
}

impl<T> fmt::Debug for Deque<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = fmt.debug_list();
        let mut cursor = self.head;
        while let Some(ix) = cursor {
            let node = self.node(ix);
            list.entry(node.value());
            cursor = node.next();
        }
        list.finish()
    }
}

impl<T> Deque<T> {
    /// Creates an empty `Deque`. No allocations are performed until
    /// values are added.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let deque: Deque<u32> = Deque::new();
    /// assert!(deque.is_empty());
    /// ```
    pub fn new() -> Deque<T> {
        Deque {
            free_list: None,
            head: None,
            tail: None,
            len_used: 0,
            len_free: 0,
            slots: Vec::new(),
        }
    }

    /// Creates an empty `Deque` with `capacity` node slots already
    /// allocated and on the free list.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let deque: Deque<u32> = Deque::try_with_capacity(16).unwrap();
    /// assert_eq!(16, deque.len_freelist());
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Deque<T>, DequeError> {
        Deque::with_config(DequeConfig::default().with_capacity(capacity))
    }

    /// Creates an empty `Deque` from `config`. Fails with
    /// `DequeError::AllocationFailure` if the preallocation cannot be
    /// satisfied.
    pub fn with_config(config: DequeConfig) -> Result<Deque<T>, DequeError> {
        let mut slots = Vec::new();
        if let Err(e) = slots.try_reserve_exact(config.capacity) {
            warn!(requested = config.capacity, error = %e, "deque preallocation failed");
            return Err(e.into());
        }

        let mut next = None;
        for i in 0..config.capacity {
            slots.push(Slot::new_vacant(next));
            next = Some(i);
        }

        Ok(Deque {
            free_list: next,
            head: None,
            tail: None,
            len_used: 0,
            len_free: config.capacity,
            slots,
        })
    }

    /// Releases every node still linked into the deque, front to back,
    /// and then the deque itself. Returns the number of nodes released.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(1).unwrap();
    /// d.push_back(2).unwrap();
    ///
    /// assert_eq!(2, d.destroy());
    /// ```
    pub fn destroy(mut self) -> usize {
        let released = self.clear();
        debug!(released, slots = self.slots.len(), "deque destroyed");
        released
    }

    /// Unlinks and drops every node, leaving the deque empty. The
    /// emptied slots stay allocated on the free list. Returns the
    /// number of nodes released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        while let Some(ix) = self.head {
            drop(self.unlink(ix));
            released += 1;
        }
        released
    }

    /// Reserves room for at least `additional` more nodes beyond the
    /// slots already in use. This grows the underlying `Vec` only; it
    /// does not add slots to the free list.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d: Deque<u32> = Deque::new();
    /// d.try_reserve(16).unwrap();
    /// assert!(d.capacity() >= 16);
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), DequeError> {
        let old_capacity = self.slots.capacity();
        if let Err(e) = self.slots.try_reserve(additional) {
            warn!(requested = additional, error = %e, "deque allocation failed");
            return Err(e.into());
        }
        if self.slots.capacity() != old_capacity {
            trace!(
                old_capacity,
                new_capacity = self.slots.capacity(),
                "deque arena grew"
            );
        }
        Ok(())
    }

    /// Returns how many slots the arena can hold without reallocating.
    /// This is not necessarily `len() + len_freelist()`.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The number of values in the deque.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d: Deque<u8> = Deque::new();
    ///
    /// d.push_front(1).unwrap();
    /// d.push_back(2).unwrap();
    /// assert_eq!(2, d.len());
    ///
    /// d.pop_front().unwrap();
    /// assert_eq!(1, d.len());
    /// ```
    pub fn len(&self) -> usize {
        self.len_used
    }

    /// True when the deque holds no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d: Deque<u8> = Deque::new();
    /// assert!(d.is_empty());
    ///
    /// d.push_front(1).unwrap();
    /// assert!(!d.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The number of vacant slots awaiting reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d: Deque<u8> = Deque::new();
    /// d.push_front(1).unwrap();
    /// assert_eq!(0, d.len_freelist());
    ///
    /// d.pop_front().unwrap();
    /// assert_eq!(1, d.len_freelist());
    /// ```
    pub fn len_freelist(&self) -> usize {
        self.len_free
    }

    /// Insert `value` at the front of the deque.
    ///
    /// Fails with `DequeError::AllocationFailure` when no slot can be
    /// allocated for the new node. The deque is unchanged in that case
    /// and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_front(10).unwrap();
    /// d.push_front(20).unwrap();
    ///
    /// assert_eq!(Ok(&20), d.peek_front());
    /// ```
    pub fn push_front(&mut self, value: T) -> Result<(), DequeError> {
        self.reserve_slot()?;

        let ix = self.allocate(None, self.head, value);

        // Point the old front back at the new node, or make the new
        // node the back too if the deque was empty.
        match self.head {
            Some(old) => self.node_mut(old).set_prev(Some(ix)),
            None => self.tail = Some(ix),
        }
        self.head = Some(ix);

        Ok(())
    }

    /// Insert `value` at the back of the deque. Same failure policy as
    /// `push_front`.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(10).unwrap();
    /// d.push_back(20).unwrap();
    ///
    /// assert_eq!(Ok(&20), d.peek_back());
    /// ```
    pub fn push_back(&mut self, value: T) -> Result<(), DequeError> {
        self.reserve_slot()?;

        let ix = self.allocate(self.tail, None, value);

        match self.tail {
            Some(old) => self.node_mut(old).set_next(Some(ix)),
            None => self.head = Some(ix),
        }
        self.tail = Some(ix);

        Ok(())
    }

    /// Remove the front of the deque and return it. Fails with
    /// `DequeError::EmptyDequeAccess` if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::{Deque, DequeError, End};
    ///
    /// let mut d = Deque::new();
    /// d.push_back(10).unwrap();
    /// d.push_back(20).unwrap();
    ///
    /// assert_eq!(Ok(10), d.pop_front());
    /// assert_eq!(Ok(20), d.pop_front());
    /// assert_eq!(Err(DequeError::EmptyDequeAccess { end: End::Front }), d.pop_front());
    /// ```
    pub fn pop_front(&mut self) -> Result<T, DequeError> {
        let ix = self.head.ok_or(DequeError::EmptyDequeAccess { end: End::Front })?;
        Ok(self.unlink(ix))
    }

    /// Remove the back of the deque and return it. Fails with
    /// `DequeError::EmptyDequeAccess` if the deque is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_front(10).unwrap();
    /// d.push_front(20).unwrap();
    ///
    /// assert_eq!(Ok(10), d.pop_back());
    /// assert_eq!(Ok(20), d.pop_back());
    /// assert!(d.pop_back().is_err());
    /// ```
    pub fn pop_back(&mut self) -> Result<T, DequeError> {
        let ix = self.tail.ok_or(DequeError::EmptyDequeAccess { end: End::Back })?;
        Ok(self.unlink(ix))
    }

    /// Get the front value without removing it.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(10).unwrap();
    ///
    /// assert_eq!(Ok(&10), d.peek_front());
    /// assert_eq!(1, d.len());
    /// ```
    pub fn peek_front(&self) -> Result<&T, DequeError> {
        let ix = self.head.ok_or(DequeError::EmptyDequeAccess { end: End::Front })?;
        Ok(self.node(ix).value())
    }

    /// Get the front value as a mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(10).unwrap();
    ///
    /// *d.peek_front_mut().unwrap() += 10;
    ///
    /// assert_eq!(Ok(&20), d.peek_front());
    /// ```
    pub fn peek_front_mut(&mut self) -> Result<&mut T, DequeError> {
        let ix = self.head.ok_or(DequeError::EmptyDequeAccess { end: End::Front })?;
        Ok(self.node_mut(ix).value_mut())
    }

    /// Get the back value without removing it.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_front(10).unwrap();
    ///
    /// assert_eq!(Ok(&10), d.peek_back());
    /// ```
    pub fn peek_back(&self) -> Result<&T, DequeError> {
        let ix = self.tail.ok_or(DequeError::EmptyDequeAccess { end: End::Back })?;
        Ok(self.node(ix).value())
    }

    /// Get the back value as a mutable reference.
    pub fn peek_back_mut(&mut self) -> Result<&mut T, DequeError> {
        let ix = self.tail.ok_or(DequeError::EmptyDequeAccess { end: End::Back })?;
        Ok(self.node_mut(ix).value_mut())
    }

    fn node(&self, ix: usize) -> &Node<T> {
        match self.slots[ix].node() {
            Some(node) => node,
            None => unreachable!("slot {} is linked but vacant", ix),
        }
    }

    fn node_mut(&mut self, ix: usize) -> &mut Node<T> {
        match self.slots[ix].node_mut() {
            Some(node) => node,
            None => unreachable!("slot {} is linked but vacant", ix),
        }
    }

    // Make sure `allocate` can place a node without growing the arena.
    fn reserve_slot(&mut self) -> Result<(), DequeError> {
        if self.free_list.is_none() {
            self.try_reserve(1)?;
        }
        Ok(())
    }

    // Callers must have made room with `reserve_slot` first.
    fn allocate(&mut self, prev: Option<usize>, next: Option<usize>, value: T) -> usize {
        let s = Slot::new_occupied(prev, next, value);

        let ix = match self.free_list {
            Some(ix) => {
                debug_assert!(self.slots[ix].vacant().is_some());
                self.free_list = self.slots[ix].vacant().and_then(Vacant::next);
                self.slots[ix] = s;
                self.len_free -= 1;
                ix
            }
            None => {
                debug_assert!(self.slots.len() < self.slots.capacity());
                self.slots.push(s);
                self.slots.len() - 1
            }
        };

        self.len_used += 1;
        ix
    }

    fn unlink(&mut self, ix: usize) -> T {
        let (prev, value, next) = self.free(ix).take();

        match prev {
            None => {
                debug_assert_eq!(Some(ix), self.head);
                self.head = next;
            }
            Some(prev_ix) => self.node_mut(prev_ix).set_next(next),
        }

        match next {
            None => {
                debug_assert_eq!(Some(ix), self.tail);
                self.tail = prev;
            }
            Some(next_ix) => self.node_mut(next_ix).set_prev(prev),
        }

        value
    }

    fn free(&mut self, ix: usize) -> Node<T> {
        let slot = std::mem::replace(&mut self.slots[ix], Slot::new_vacant(self.free_list));
        self.free_list = Some(ix);
        self.len_free += 1;
        self.len_used -= 1;

        match slot.into_node() {
            Some(node) => node,
            None => unreachable!("slot {} was freed twice", ix),
        }
    }
}

#[cfg(test)]
impl<T: Clone> Deque<T> {
    // Walk the chain both ways, asserting the link invariants, and
    // return the values front to back.
    fn check_links(&self) -> Vec<T> {
        assert_eq!(self.head.is_none(), self.tail.is_none());

        let mut forward = Vec::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(ix) = cursor {
            let node = self.node(ix);
            assert_eq!(prev, node.prev());
            forward.push(node.value().clone());
            prev = Some(ix);
            cursor = node.next();
            assert!(forward.len() <= self.len_used, "cycle in next links");
        }
        assert_eq!(self.tail, prev);

        let mut steps_back = 0;
        let mut first = None;
        let mut cursor = self.tail;
        while let Some(ix) = cursor {
            first = Some(ix);
            cursor = self.node(ix).prev();
            if cursor.is_some() {
                steps_back += 1;
            }
            assert!(steps_back <= self.len_used, "cycle in prev links");
        }
        assert_eq!(self.head, first);

        assert_eq!(self.len_used, forward.len());
        assert_eq!(self.len_used.saturating_sub(1), steps_back);
        assert_eq!(self.slots.len(), self.len_used + self.len_free);
        forward
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn new_deque_is_empty() {
        let l: Deque<u8> = Deque::new();

        assert!(l.is_empty());
        assert_eq!(0, l.len());
        assert_eq!(0, l.capacity());
        assert!(l.check_links().is_empty());
    }

    #[test]
    fn push_peek_works() {
        let mut l = Deque::new();
        l.push_front(10u8).unwrap();

        assert_eq!(Ok(&10), l.peek_front());
        assert_eq!(Ok(&10), l.peek_back());
        assert_eq!(l.head, l.tail);

        let mut l = Deque::new();
        l.push_back(11u8).unwrap();

        assert_eq!(Ok(&11), l.peek_front());
        assert_eq!(Ok(&11), l.peek_back());
        assert_eq!(l.head, l.tail);
    }

    #[test]
    fn push_back_works() {
        let mut l = Deque::new();
        l.push_back(10u8).unwrap();
        l.push_back(11u8).unwrap();

        assert_eq!(Ok(&10), l.peek_front());
        assert_eq!(Ok(&11), l.peek_back());
        assert_eq!(vec![10, 11], l.check_links());
    }

    #[test]
    fn mixed_ends_scenario() {
        let mut l = Deque::new();
        l.push_back(1).unwrap();
        l.push_back(2).unwrap();
        l.push_front(0).unwrap();
        assert_eq!(vec![0, 1, 2], l.check_links());

        assert_eq!(Ok(0), l.pop_front());
        assert_eq!(vec![1, 2], l.check_links());

        assert_eq!(Ok(2), l.pop_back());
        assert_eq!(vec![1], l.check_links());
        assert!(!l.is_empty());

        assert_eq!(Ok(1), l.pop_front());
        assert!(l.is_empty());
        assert!(l.check_links().is_empty());
    }

    #[test]
    fn counts_work_as_expected() {
        let mut l = Deque::new();
        l.push_front(10u8).unwrap();
        l.push_front(11u8).unwrap();
        assert_eq!(2, l.len());
        assert_eq!(0, l.len_freelist());

        l.pop_back().unwrap();
        assert_eq!(1, l.len());
        assert_eq!(1, l.len_freelist());

        l.pop_back().unwrap();
        assert_eq!(0, l.len());
        assert_eq!(2, l.len_freelist());

        l.push_front(12u8).unwrap();
        assert_eq!(1, l.len());
        assert_eq!(1, l.len_freelist());

        l.push_front(13u8).unwrap();
        assert_eq!(2, l.len());
        assert_eq!(0, l.len_freelist());
    }

    #[test]
    fn with_capacity_preallocates_free_list() {
        let mut l = Deque::try_with_capacity(3).unwrap();
        assert_eq!(3, l.len_freelist());
        assert_eq!(0, l.len());

        l.push_front(()).unwrap();
        assert_eq!(2, l.len_freelist());
        assert_eq!(1, l.len());

        // The underlying capacity should not have changed.
        assert_eq!(3, l.capacity());

        l.push_front(()).unwrap();
        l.push_front(()).unwrap();
        l.push_front(()).unwrap();

        assert_eq!(0, l.len_freelist());
        assert_eq!(4, l.len());
        assert!(3 < l.capacity());
    }

    #[test]
    fn impossible_preallocation_is_an_allocation_failure() {
        let r: Result<Deque<u64>, _> = Deque::try_with_capacity(usize::MAX);

        match r {
            Err(DequeError::AllocationFailure(_)) => {}
            other => panic!("expected allocation failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn failed_reserve_leaves_deque_unchanged() {
        let mut l = Deque::new();
        l.push_back(1u64).unwrap();
        l.push_back(2u64).unwrap();

        assert!(matches!(
            l.try_reserve(usize::MAX),
            Err(DequeError::AllocationFailure(_))
        ));
        assert_eq!(vec![1, 2], l.check_links());
    }

    #[test]
    fn reserve_increases_capacity() {
        let mut l: Deque<u8> = Deque::new();
        l.push_front(1).unwrap();

        let res = l.capacity() + 16;
        l.try_reserve(res).unwrap();

        assert!(l.capacity() >= res);
        assert_eq!(0, l.len_freelist());
    }

    #[test]
    fn peek_mut_changes_values_in_place() {
        let mut l = Deque::new();
        l.push_back(10u8).unwrap();
        l.push_back(20u8).unwrap();

        *l.peek_front_mut().unwrap() = 100;
        *l.peek_back_mut().unwrap() += 1;

        assert_eq!(vec![100, 21], l.check_links());
    }

    #[test]
    fn empty_list() {
        let mut l: Deque<u8> = Deque::new();
        l.push_front(1).unwrap();
        l.pop_front().unwrap();

        assert!(l.is_empty());

        let front = Err(DequeError::EmptyDequeAccess { end: End::Front });
        let back = Err(DequeError::EmptyDequeAccess { end: End::Back });

        assert_eq!(front, l.peek_front().map(|v| *v));
        assert_eq!(front, l.peek_front_mut().map(|v| *v));
        assert_eq!(back, l.peek_back().map(|v| *v));
        assert_eq!(back, l.peek_back_mut().map(|v| *v));
        assert_eq!(front, l.pop_front());
        assert_eq!(back, l.pop_back());

        assert!(l.check_links().is_empty());
    }

    #[test]
    fn clear_keeps_slots_on_free_list() {
        let mut l = Deque::new();
        l.push_back(1u8).unwrap();
        l.push_back(2u8).unwrap();
        l.push_front(0u8).unwrap();

        assert_eq!(3, l.clear());
        assert!(l.is_empty());
        assert_eq!(3, l.len_freelist());
        assert_eq!(0, l.clear());

        l.push_back(4).unwrap();
        assert_eq!(vec![4], l.check_links());
    }

    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn destroy_releases_remaining_nodes() {
        let drops = Rc::new(Cell::new(0));
        let mut l = Deque::new();
        for _ in 0..4 {
            l.push_back(Tracked(drops.clone())).unwrap();
        }
        drop(l.pop_front().unwrap());
        assert_eq!(1, drops.get());

        assert_eq!(3, l.destroy());
        assert_eq!(4, drops.get());
    }

    #[test]
    fn drop_releases_remaining_nodes() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut l = Deque::new();
            l.push_front(Tracked(drops.clone())).unwrap();
            l.push_back(Tracked(drops.clone())).unwrap();
        }
        assert_eq!(2, drops.get());
    }

    #[test]
    fn debug_string() {
        let mut l: Deque<u8> = Deque::new();

        l.push_back(1).unwrap();
        l.push_back(2).unwrap();
        l.push_front(0).unwrap();

        assert_eq!("[0, 1, 2]", format!("{:?}", l));
        assert_eq!("[]", format!("{:?}", Deque::<u8>::default()));
    }

    proptest! {
        #[test]
        fn links_stay_consistent(
            actions in proptest::collection::vec(any::<u16>(), 0..128)
        ) {
            let mut l: Deque<u16> = Deque::new();

            for a in actions {
                match a & 0x03 {
                    0x00 => l.push_front(a).unwrap(),
                    0x01 => l.push_back(a).unwrap(),
                    0x02 => { let _ = l.pop_front(); },
                    0x03 => { let _ = l.pop_back(); },
                    _ => unreachable!(),
                }
                l.check_links();
            }
        }
    }
}
