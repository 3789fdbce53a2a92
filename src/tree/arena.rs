//! Generational slot arena
//!
//! Storage for tree nodes and order-list links. Slots are addressed by a
//! (index, generation) key; freed slots are recycled through a free list and
//! their generation is bumped so stale keys stop resolving.

use crate::types::NodeId;
use std::collections::TryReserveError;

/// Key types that can address an arena slot
pub trait ArenaKey: Copy {
    fn from_parts(index: u32, generation: u32) -> Self;
    fn index(&self) -> u32;
    fn generation(&self) -> u32;
}

impl ArenaKey for NodeId {
    fn from_parts(index: u32, generation: u32) -> Self {
        NodeId::new(index, generation)
    }

    fn index(&self) -> u32 {
        self.index
    }

    fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    entry: Option<T>,
}

/// Arena of `T` addressed by keys of type `K`
#[derive(Debug, Clone)]
pub struct Arena<K, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
    _key: std::marker::PhantomData<K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            _key: std::marker::PhantomData,
        }
    }

    /// Make room for `additional` inserts without reallocating.
    ///
    /// After a successful call the next `additional` calls to [`Arena::insert`]
    /// and their matching [`Arena::remove`] calls cannot allocate.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let fresh = additional.saturating_sub(self.free.len());
        let vacant_after = self.slots.len() + fresh;
        let spare = self.slots.capacity() - self.slots.len();
        if fresh > spare {
            self.slots.try_reserve(fresh)?;
        }
        // Every slot may end up on the free list at once.
        let needed = vacant_after.saturating_sub(self.free.len());
        let free_spare = self.free.capacity() - self.free.len();
        if needed > free_spare {
            self.free.try_reserve(needed)?;
        }
        Ok(())
    }

    /// Store a value and return its key
    pub fn insert(&mut self, value: T) -> K {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(value);
            return K::from_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(value),
        });
        K::from_parts(index, 0)
    }

    /// Release a slot, returning its value if the key was live
    pub fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        let value = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index());
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        let slot = self.slots.get(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.index() as usize)?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|value| (K::from_parts(index as u32, slot.generation), value))
        })
    }
}
