//! Fixed-capacity entity pool
//!
//! All slots are allocated up front; acquiring and releasing only moves slot
//! indices between a free stack and the active list. The pool never grows.
//!
//! # Iteration hazard
//!
//! [`EntityPool::release_at`] swap-removes from the active list, so the entity
//! that was last moves into the released position. Callers walking the active
//! list by position must NOT advance their cursor after releasing the current
//! position; the entity now at that position has not been visited yet:
//!
//! ```
//! # use vertical_shmup::sim::{EntityPool, Pooled};
//! # #[derive(Default)] struct Dot { active: bool, dead: bool }
//! # impl Pooled for Dot {
//! #     fn is_active(&self) -> bool { self.active }
//! #     fn set_active(&mut self, active: bool) { self.active = active; }
//! # }
//! # let mut pool: EntityPool<Dot> = EntityPool::new(4);
//! let mut i = 0;
//! while i < pool.active_len() {
//!     if pool.get(i).is_some_and(|d| d.dead) {
//!         pool.release_at(i); // do not advance
//!     } else {
//!         i += 1;
//!     }
//! }
//! ```
//!
//! Order within the active list is otherwise unspecified and only meaningful
//! immediately after [`EntityPool::sort_active_by`].

use std::cmp::Ordering;

/// An entity that can live in an [`EntityPool`]
pub trait Pooled: Default {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

/// Compacting active list over permanently allocated slots
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<T>,
    /// Slot indices available for `acquire` (stack)
    free: Vec<usize>,
    /// Slot indices currently live, in iteration order
    active: Vec<usize>,
}

impl<T: Pooled> EntityPool<T> {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| T::default()).collect();
        // Reverse so the first acquire hands out slot 0
        let free = (0..capacity).rev().collect();
        Self {
            slots,
            free,
            active: Vec::with_capacity(capacity),
        }
    }

    /// Take one inactive slot and mark it active.
    ///
    /// Returns `None` when every slot is in use; callers skip the spawn.
    pub fn acquire(&mut self) -> Option<&mut T> {
        let slot = self.free.pop()?;
        self.active.push(slot);
        let entity = &mut self.slots[slot];
        entity.set_active(true);
        Some(entity)
    }

    /// Deactivate the entity at `index` of the active list (swap-remove).
    ///
    /// Out-of-range indices are ignored.
    pub fn release_at(&mut self, index: usize) {
        if index >= self.active.len() {
            return;
        }
        let slot = self.active.swap_remove(index);
        self.slots[slot].set_active(false);
        self.free.push(slot);
    }

    /// Release every active entity
    pub fn clear(&mut self) {
        while !self.active.is_empty() {
            self.release_at(self.active.len() - 1);
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.active.get(index).map(|&slot| &self.slots[slot])
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let slot = *self.active.get(index)?;
        Some(&mut self.slots[slot])
    }

    /// Live entities in active-list order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.active.iter().map(|&slot| &self.slots[slot])
    }

    /// Reorder the active list; slots themselves never move
    pub fn sort_active_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let slots = &self.slots;
        self.active.sort_by(|&a, &b| compare(&slots[a], &slots[b]));
    }
}
