//! Vector-backed slot storage with stable handles.
//!
//! Removed slots go on a free list and are reused by later inserts, so a
//! cache that churns at full capacity never grows its backing `Vec` past the
//! high-water mark.
//!
//! ```text
//!   slots:     [Some(a)] [None] [Some(c)] [Some(d)]
//!   free_list: [1]
//!
//!   insert(e) -> SlotId(1)
//!   slots:     [Some(a)] [Some(e)] [Some(c)] [Some(d)]
//! ```

/// Stable handle to a slot in a [`SlotArena`].
///
/// A handle stays valid until its slot is removed; after that the index may
/// be handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Creates an arena with room for `capacity` live slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated, live or free.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Iterates live slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_slot_is_reused() {
        let mut arena = SlotArena::new();
        let first = arena.insert("mykey1");
        let second = arena.insert("mykey2");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(first), Some(&"mykey1"));
        assert_eq!(arena.get(second), Some(&"mykey2"));

        assert_eq!(arena.remove(first), Some("mykey1"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(first));

        let third = arena.insert("mykey3");
        assert_eq!(third.index(), first.index());
        assert_eq!(arena.get(third), Some(&"mykey3"));
        assert_eq!(arena.allocated(), 2);
    }

    #[test]
    fn double_remove_is_none() {
        let mut arena = SlotArena::new();
        let id = arena.insert(42);
        assert_eq!(arena.remove(id), Some(42));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn out_of_range_id_is_absent() {
        let mut arena: SlotArena<u8> = SlotArena::with_capacity(4);
        assert!(!arena.contains(SlotId(7)));
        assert_eq!(arena.get(SlotId(7)), None);
        assert_eq!(arena.get_mut(SlotId(7)), None);
        assert_eq!(arena.remove(SlotId(7)), None);
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut arena = SlotArena::new();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        let c = arena.insert(3);
        arena.remove(a);
        let live: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec![2, 3]);

        if let Some(value) = arena.get_mut(c) {
            *value = 30;
        }
        assert_eq!(arena.get(c), Some(&30));

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.allocated(), 0);
    }
}
