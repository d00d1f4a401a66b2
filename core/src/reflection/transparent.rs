//! Transparent Pass-Through

use super::*;

/// Specular transmission that continues straight through the surface without
/// bending, as used for cut-out masks.
#[derive(Copy, Clone, Debug)]
pub struct Transparent<'a> {
    /// Fraction of light passed through.
    transmittance: &'a dyn Reflector,
}

impl<'a> Transparent<'a> {
    /// Allocate a new `Transparent`.
    ///
    /// * `allocator`     - The BxDF allocator.
    /// * `transmittance` - Fraction of light passed through.
    pub fn alloc(allocator: &BxdfAllocator<'a>, transmittance: &'a dyn Reflector) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self { transmittance });
        allocator.allocate(Bxdf::Transparent(model))
    }

    /// Returns the direction opposite `incoming`.
    ///
    /// * `incoming`      - The incoming direction.
    /// * `differentials` - Optional directions of offset rays.
    pub fn sample(
        &self,
        incoming: &Vector3f,
        differentials: Option<&Differentials>,
    ) -> Option<SpecularSample<'a>> {
        if incoming.z == 0.0 {
            return None;
        }

        Some(SpecularSample {
            hemisphere: Hemisphere::Btdf,
            reflectance: self.transmittance,
            direction: -*incoming,
            differentials: differentials.map(|d| d.map(|w| -*w)),
            pdf: None,
        })
    }
}

/// Returns a pass-through BTDF, or `None` if `transmittance` is absent.
///
/// * `allocator`     - The BxDF allocator.
/// * `transmittance` - Fraction of light passed through.
pub fn make_transparent_btdf<'a>(
    allocator: &BxdfAllocator<'a>,
    transmittance: Option<&'a dyn Reflector>,
) -> Option<&'a Bxdf<'a>> {
    Some(Transparent::alloc(allocator, transmittance?))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::with_allocators;
    use crate::rng::RNG;

    #[test]
    fn passes_straight_through() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_transparent_btdf(bxdfs, spectra.uniform(0.5)).unwrap();
            let incoming = Vector3f::new(0.3, 0.0, -0.7);
            let normal = Vector3f::new(0.0, 0.0, 1.0);
            let mut rng = RNG::new(8);
            let mut sampler = Sampler::new(&mut rng);

            match bxdf.sample(&incoming, None, &normal, &mut sampler, spectra) {
                SampleResult::Specular(s) => {
                    assert_eq!(s.hemisphere, Hemisphere::Btdf);
                    assert_eq!(s.direction, Vector3f::new(-0.3, 0.0, 0.7));
                    assert!(s.differentials.is_none());
                }
                other => panic!("expected a specular sample, got {:?}", other),
            }
        });
    }

    #[test]
    fn absent_transmittance_is_absent() {
        with_allocators(|bxdfs, _| {
            assert!(make_transparent_btdf(bxdfs, None).is_none());
        });
    }
}
