//! BxDF Allocator

use super::Bxdf;
use crate::memory::Arena;

/// Allocates scattering models and lists of them in an arena.
#[derive(Copy, Clone)]
pub struct BxdfAllocator<'a> {
    /// The arena for memory allocations.
    arena: &'a Arena,
}

impl<'a> BxdfAllocator<'a> {
    /// Create a new `BxdfAllocator`.
    ///
    /// * `arena` - The arena for memory allocations.
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena }
    }

    /// Returns the arena backing this allocator.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Moves `value` into the arena.
    ///
    /// * `value` - The value to store.
    pub fn allocate<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    /// Copies the present handles into arena storage, preserving order.
    ///
    /// * `bxdfs` - Handles that may be absent.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate_list(&self, bxdfs: &[Option<&'a Bxdf<'a>>]) -> &'a mut [&'a Bxdf<'a>] {
        self.arena.alloc_list(bxdfs)
    }
}
