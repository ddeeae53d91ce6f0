pub(crate) struct Vacant {
    // The next vacant slot on the free list.
    next: Option<usize>,
}

impl Vacant {
    pub(crate) fn next(&self) -> Option<usize> {
        self.next
    }
}

pub(crate) struct Node<T> {
    // The slot holding the node toward the front.
    prev: Option<usize>,
    // The slot holding the node toward the back.
    next: Option<usize>,
    value: T,
}

impl<T> Node<T> {
    pub(crate) fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub(crate) fn set_prev(&mut self, prev: Option<usize>) {
        self.prev = prev;
    }

    pub(crate) fn next(&self) -> Option<usize> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<usize>) {
        self.next = next;
    }

    pub(crate) fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn take(self) -> (Option<usize>, T, Option<usize>) {
        let Node { prev, value, next } = self;
        (prev, value, next)
    }
}

/// A single arena cell. Occupied slots are linked into the deque,
/// vacant slots into the free list.
pub(crate) enum Slot<T> {
    Vacant(Vacant),
    Occupied(Node<T>),
}

impl<T> Slot<T> {
    pub(crate) fn new_vacant(next: Option<usize>) -> Slot<T> {
        Slot::Vacant(Vacant { next })
    }

    pub(crate) fn new_occupied(prev: Option<usize>, next: Option<usize>, value: T) -> Slot<T> {
        Slot::Occupied(Node { prev, next, value })
    }

    pub(crate) fn node(&self) -> Option<&Node<T>> {
        if let Slot::Occupied(node) = self {
            Some(node)
        } else {
            None
        }
    }

    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<T>> {
        if let Slot::Occupied(node) = self {
            Some(node)
        } else {
            None
        }
    }

    pub(crate) fn vacant(&self) -> Option<&Vacant> {
        if let Slot::Vacant(vacant) = self {
            Some(vacant)
        } else {
            None
        }
    }

    pub(crate) fn into_node(self) -> Option<Node<T>> {
        if let Slot::Occupied(node) = self {
            Some(node)
        } else {
            None
        }
    }
}
