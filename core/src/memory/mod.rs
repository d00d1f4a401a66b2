//! Memory Management

mod arena;

// Re-export
pub use arena::*;
