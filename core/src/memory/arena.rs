//! Arena

use bumpalo::Bump;

/// Bump-only memory region for the ephemeral objects of one shading
/// evaluation.
///
/// Everything allocated here is borrowed from the arena, so the borrow checker
/// guarantees that no handle survives a call to `reset()`. Destructors of
/// allocated values never run; only trivially destructible values belong here.
#[derive(Default)]
pub struct Arena {
    /// The underlying bump allocator.
    bump: Bump,
}

impl Arena {
    /// Create a new empty `Arena`.
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// Create a new `Arena` with room for `capacity` bytes before it needs to
    /// grow.
    ///
    /// * `capacity` - Initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// Returns `size` bytes of zeroed storage.
    ///
    /// * `size` - Number of bytes.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, size: usize) -> &mut [u8] {
        self.bump.alloc_slice_fill_copy(size, 0_u8)
    }

    /// Moves `value` into the arena and returns a reference that stays valid
    /// until the arena is reset.
    ///
    /// * `value` - The value to store.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> &mut T {
        self.bump.alloc(value)
    }

    /// Returns a slice of `len` default-initialized values.
    ///
    /// * `len` - Number of elements.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_zeroed<T: Copy + Default>(&self, len: usize) -> &mut [T] {
        self.bump.alloc_slice_fill_default(len)
    }

    /// Copies the present entries of `items` into arena storage, dropping the
    /// absent ones while preserving order.
    ///
    /// * `items` - References that may be absent.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_list<'a, T: ?Sized>(&'a self, items: &[Option<&'a T>]) -> &'a mut [&'a T] {
        let present: Vec<&'a T> = items.iter().flatten().copied().collect();
        self.bump.alloc_slice_copy(&present)
    }

    /// Releases every allocation at once. Requires exclusive access so no
    /// outstanding handle can observe the reuse.
    pub fn reset(&mut self) {
        self.bump.reset();
    }

    /// Returns the number of bytes currently reserved by the arena.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_zeroed() {
        let arena = Arena::new();
        let bytes = arena.allocate(64);
        assert_eq!(bytes.len(), 64);
        assert!(bytes.iter().all(|b| *b == 0));
    }

    #[test]
    fn alloc_list_drops_absent_entries() {
        let arena = Arena::new();
        let a = arena.alloc(1_u32);
        let b = arena.alloc(2_u32);
        let list = arena.alloc_list(&[None, Some(&*a), None, Some(&*b)]);
        assert_eq!(list.len(), 2);
        assert_eq!(*list[0], 1);
        assert_eq!(*list[1], 2);
    }

    #[test]
    fn alloc_list_of_nothing_is_empty() {
        let arena = Arena::new();
        let list = arena.alloc_list::<u32>(&[None, None]);
        assert!(list.is_empty());
    }

    #[test]
    fn reset_allows_reuse() {
        let mut arena = Arena::with_capacity(1024);
        for i in 0..4_u64 {
            let v = arena.alloc(i);
            assert_eq!(*v, i);
            arena.reset();
        }
        assert!(arena.allocated_bytes() >= 1024);
    }
}
