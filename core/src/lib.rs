//! Surface scattering models for a physically based renderer.
//!
//! Scattering functions, the reflectances they return and any scratch space
//! they need are allocated from a per-sample `memory::Arena` through
//! `reflection::BxdfAllocator` and `spectrum::SpectralAllocator`. Resetting
//! the arena releases everything at once.

#[macro_use]
extern crate log;

pub mod geometry;
pub mod interpolation;
pub mod math;
pub mod memory;
pub mod microfacet;
pub mod reflection;
pub mod rng;
pub mod sampling;
pub mod spectrum;
