use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::Result;

/// Generic storage trait for simulation objects
pub trait Storage<T, H> {
    /// Creates a new empty storage
    fn new() -> Self;

    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    /// Gets a reference to an item by its handle
    fn get(&self, handle: H) -> Option<&T>;

    /// Gets a mutable reference to an item by its handle
    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    /// Removes an item from the storage
    fn remove(&mut self, handle: H) -> Option<T>;

    /// Returns the number of items in the storage
    fn len(&self) -> usize;

    /// Returns whether the storage is empty
    fn is_empty(&self) -> bool;

    /// Clears all items from the storage
    fn clear(&mut self);

    /// Returns all live handles in insertion order
    fn handles(&self) -> Vec<H>;

    /// Returns an iterator over all items in insertion order
    fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a T)> + 'a where T: 'a;
}

struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

/// Generational slot storage for bodies.
///
/// Handles stay valid until their item is removed; a reused slot gets a new
/// generation so stale handles never alias a newer body. Iteration follows
/// insertion order.
pub struct BodyStorage<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<BodyHandle>,
}

impl<T> Storage<T, BodyHandle> for BodyStorage<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    fn add(&mut self, item: T) -> BodyHandle {
        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation = slot.generation.wrapping_add(1);
                slot.item = Some(item);
                BodyHandle::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, item: Some(item) });
                BodyHandle::new(index, 0)
            }
        };
        self.order.push(handle);
        handle
    }

    fn get(&self, handle: BodyHandle) -> Option<&T> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.item.as_ref())
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.item.as_mut())
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let item = slot.item.take()?;
        self.free.push(handle.index());
        self.order.retain(|h| *h != handle);
        Some(item)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn clear(&mut self) {
        // slots survive so their generations keep outliving old handles
        for slot in &mut self.slots {
            slot.item = None;
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.order.clear();
    }

    fn handles(&self) -> Vec<BodyHandle> {
        self.order.clone()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = (BodyHandle, &'a T)> + 'a where T: 'a {
        self.order
            .iter()
            .filter_map(move |h| self.get(*h).map(|item| (*h, item)))
    }
}

impl<T> BodyStorage<T> {
    /// Returns whether the handle refers to a live item
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| PhysicsError::LookupFailed(format!("body {} is not live", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| PhysicsError::LookupFailed(format!("body {} is not live", handle)))
    }

    /// Borrows two distinct live items mutably at once
    pub fn get_pair_mut(&mut self, a: BodyHandle, b: BodyHandle) -> Result<(&mut T, &mut T)> {
        if a.index() == b.index() {
            return Err(PhysicsError::InvalidArgument(format!(
                "cannot borrow body {} against itself",
                a
            )));
        }
        self.get_body(a)?;
        self.get_body(b)?;

        let (low, high, swapped) = if a.index() < b.index() {
            (a.index() as usize, b.index() as usize, false)
        } else {
            (b.index() as usize, a.index() as usize, true)
        };
        let (head, tail) = self.slots.split_at_mut(high);
        let (Some(first), Some(second)) = (head[low].item.as_mut(), tail[0].item.as_mut()) else {
            return Err(PhysicsError::LookupFailed(format!("body pair ({}, {}) is not live", a, b)));
        };
        Ok(if swapped { (second, first) } else { (first, second) })
    }
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        <Self as Storage<T, BodyHandle>>::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut storage: BodyStorage<&str> = Storage::new();
        let first = storage.add("first");
        assert_eq!(storage.remove(first), Some("first"));

        let second = storage.add("second");
        assert_eq!(first.index(), second.index());
        assert!(storage.get(first).is_none());
        assert_eq!(storage.get(second), Some(&"second"));
    }

    #[test]
    fn clear_keeps_old_handles_dead() {
        let mut storage: BodyStorage<&str> = Storage::new();
        let old = storage.add("old");
        let other = storage.add("other");
        storage.clear();
        assert!(storage.is_empty());
        assert!(storage.get(old).is_none());

        let new = storage.add("new");
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(storage.get(old).is_none());
        assert!(storage.get(other).is_none());
        assert_eq!(storage.get(new), Some(&"new"));
        assert_eq!(storage.handles(), vec![new]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut storage: BodyStorage<u32> = Storage::new();
        let a = storage.add(1);
        let b = storage.add(2);
        let c = storage.add(3);
        storage.remove(a);
        let d = storage.add(4);
        assert_eq!(storage.handles(), vec![b, c, d]);
        let values: Vec<u32> = storage.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2, 3, 4]);
    }

    #[test]
    fn pair_borrow_keeps_argument_order() {
        let mut storage: BodyStorage<u32> = Storage::new();
        let a = storage.add(10);
        let b = storage.add(20);
        let (x, y) = storage.get_pair_mut(b, a).unwrap();
        assert_eq!((*x, *y), (20, 10));
        *x += 1;
        assert_eq!(storage.get(b), Some(&21));
        assert!(storage.get_pair_mut(a, a).is_err());
    }
}
