use crate::error::Result;

/// Index of a slot in an [`Arena`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub(crate) struct NodeId(usize);

/// Slot storage for tree nodes. Freed slots are recycled by later allocations.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Stores `element` and returns its id.
    /// Fails without side effects when storage cannot grow.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<NodeId> {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.0].is_none());
            self.slots[id.0] = Some(element);
            return Ok(id);
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Some(element));
        Ok(NodeId(self.slots.len() - 1))
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &T {
        self.slots[id.0]
            .as_ref()
            .expect("`Arena::get()` - `id` is vacant")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut T {
        self.slots[id.0]
            .as_mut()
            .expect("`Arena::get_mut()` - `id` is vacant")
    }

    /// Returns mutable references to two distinct slots.
    pub(crate) fn get2_mut(&mut self, a: NodeId, b: NodeId) -> (&mut T, &mut T) {
        assert_ne!(a, b, "`Arena::get2_mut()` - ids must differ");
        let (lo, hi, swapped) = if a.0 < b.0 {
            (a.0, b.0, false)
        } else {
            (b.0, a.0, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let lo_ref = head[lo]
            .as_mut()
            .expect("`Arena::get2_mut()` - `id` is vacant");
        let hi_ref = tail[0]
            .as_mut()
            .expect("`Arena::get2_mut()` - `id` is vacant");
        if swapped {
            (hi_ref, lo_ref)
        } else {
            (lo_ref, hi_ref)
        }
    }

    pub(crate) fn take(&mut self, id: NodeId) -> T {
        let element = self.slots[id.0]
            .take()
            .expect("`Arena::take()` - `id` is vacant");
        self.free.push(id);
        element
    }

    /// Drops every element and releases the slot storage.
    pub(crate) fn clear(&mut self) {
        self.slots = Vec::new();
        self.free = Vec::new();
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity() + self.free.capacity()
    }
}
