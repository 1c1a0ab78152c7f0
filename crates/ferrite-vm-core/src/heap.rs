//! Object arena
//!
//! Objects are addressed by [`ObjectRef`] handles that index into a single
//! vector. Prototype links are plain handles, so cyclic graphs need no
//! special ownership. Objects live as long as the heap; reclaiming them is
//! left to the embedder.

use crate::object::ObjectRecord;
use crate::value::ObjectRef;

/// Arena owning every object of a realm
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<ObjectRecord>,
}

impl Heap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a record into the arena
    pub fn alloc(&mut self, record: ObjectRecord) -> ObjectRef {
        let index = self.objects.len();
        self.objects.push(record);
        ObjectRef(index)
    }

    /// Borrow a record. Handles are only minted by [`Heap::alloc`], so an
    /// out-of-range handle means it came from another heap.
    pub fn get(&self, obj: ObjectRef) -> &ObjectRecord {
        &self.objects[obj.index()]
    }

    /// Mutably borrow a record
    pub fn get_mut(&mut self, obj: ObjectRef) -> &mut ObjectRecord {
        &mut self.objects[obj.index()]
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// No objects allocated
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectKind;

    #[test]
    fn test_alloc_returns_dense_handles() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, None));
        let b = heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, Some(a)));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(heap.get(b).prototype(), Some(a));
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn test_every_handle_addresses_its_own_record() {
        let mut heap = Heap::new();
        let handles: Vec<_> = (0..64)
            .map(|_| heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, None)))
            .collect();
        for (position, handle) in handles.iter().enumerate() {
            assert_eq!(handle.index(), position);
        }
        // Prototype links keep pointing at the record they were given
        let last = heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, Some(handles[63])));
        assert_eq!(heap.get(last).prototype(), Some(handles[63]));
        assert_ne!(last, handles[63]);
    }

    #[test]
    fn test_cycles_are_representable() {
        let mut heap = Heap::new();
        let a = heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, None));
        let b = heap.alloc(ObjectRecord::new(ObjectKind::Ordinary, Some(a)));
        heap.get_mut(a).set_parent_scope(Some(b));
        assert_eq!(heap.get(a).parent_scope(), Some(b));
    }
}
