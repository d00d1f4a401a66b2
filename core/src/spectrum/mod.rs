//! Spectral Composition

mod allocator;
mod composite;
mod conductor;
mod sampled;
mod uniform;

// Re-export
pub use allocator::*;
pub use sampled::*;
pub use uniform::*;

use crate::math::*;
use std::fmt::Debug;

/// Wavelength-indexed fractional attenuation. Bounded implementations return
/// values in `[0, 1]`; the unbounded combinators may exceed 1 for
/// intermediates that the caller normalizes.
pub trait Reflector: Debug + Send + Sync {
    /// Returns the reflectance at the given wavelength.
    ///
    /// * `wavelength` - Wavelength in nanometers.
    fn reflectance(&self, wavelength: Float) -> Float;
}

/// Wavelength-indexed non-negative radiometric intensity.
pub trait Spectrum: Debug + Send + Sync {
    /// Returns the intensity at the given wavelength.
    ///
    /// * `wavelength` - Wavelength in nanometers.
    fn intensity(&self, wavelength: Float) -> Float;
}

/// Returns true if `r` is the shared perfect reflector.
///
/// * `r` - The reflector.
pub fn is_perfect_reflector(r: &dyn Reflector) -> bool {
    std::ptr::addr_eq(r as *const dyn Reflector, &PERFECT_REFLECTOR as *const UniformReflector)
}

/// Returns true if two optional reflectors refer to the same object, or are
/// both absent.
///
/// * `a` - First reflector.
/// * `b` - Second reflector.
pub fn same_reflector(a: Option<&dyn Reflector>, b: Option<&dyn Reflector>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => std::ptr::addr_eq(a as *const dyn Reflector, b as *const dyn Reflector),
        _ => false,
    }
}
