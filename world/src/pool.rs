//! Fixed-capacity slot arenas backing bots, projectiles and particles.

/// Fixed-capacity collection of reusable slots.
///
/// Acquisition scans for the first free slot and returns `None` once every
/// slot is taken; the pool never grows. Released slots keep whatever their
/// previous occupant left behind, so spawn code must overwrite every field
/// before the slot is used again.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    active: bool,
    item: T,
}

impl<T: Default> Pool<T> {
    /// Allocates every slot up front, all inactive.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity)
                .map(|_| Slot {
                    active: false,
                    item: T::default(),
                })
                .collect(),
        }
    }
}

impl<T> Pool<T> {
    /// Number of slots, active or not.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    /// Activates the first free slot and hands out its stale contents.
    pub fn acquire(&mut self) -> Option<(usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.active)
            .map(|(index, slot)| {
                slot.active = true;
                (index, &mut slot.item)
            })
    }

    /// Returns a slot to the free list. Out-of-range indices are ignored.
    pub fn release(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.active = false;
        }
    }

    /// Deactivates every slot.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    /// Reports whether the slot at `index` is active.
    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.active)
    }

    /// Active occupant of the slot, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots
            .get(index)
            .filter(|slot| slot.active)
            .map(|slot| &slot.item)
    }

    /// Mutable access to the active occupant of the slot, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots
            .get_mut(index)
            .filter(|slot| slot.active)
            .map(|slot| &mut slot.item)
    }

    /// Active occupants in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (index, &slot.item))
    }

    /// Mutable active occupants in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (index, &mut slot.item))
    }
}
