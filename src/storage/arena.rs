//! Generational arena backing the student store.
//!
//! Every insertion is stamped with a generation that is never reused, so a
//! [`Handle`] to a removed value stays detectably stale even after its slot
//! is recycled.

/// Stable reference to a value in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

impl Handle {
    /// Returns the slot index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the generation stamp.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u64,
    value: Option<T>,
}

/// Slot storage addressed by generational handles.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    next_generation: u64,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            next_generation: 0,
            len: 0,
        }
    }

    /// Returns the number of live values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the arena holds no live values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> Handle {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.len += 1;

        if let Some(index) = self.free.pop() {
            self.slots[index] = Slot {
                generation,
                value: Some(value),
            };
            return Handle { index, generation };
        }

        self.slots.push(Slot {
            generation,
            value: Some(value),
        });
        Handle {
            index: self.slots.len() - 1,
            generation,
        }
    }

    /// Returns the value behind `handle`, or `None` if it is stale.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Returns the value behind `handle` mutably, or `None` if it is stale.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Removes and returns the value behind `handle`.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)?;
        let value = slot.value.take()?;
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Removes every value. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}
