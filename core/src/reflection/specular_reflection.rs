//! Specular Reflection

use super::*;

/// Perfect mirror reflection.
#[derive(Copy, Clone, Debug)]
pub struct SpecularReflection<'a> {
    /// Fraction of light reflected.
    reflectance: &'a dyn Reflector,
}

impl<'a> SpecularReflection<'a> {
    /// Allocate a new `SpecularReflection`.
    ///
    /// * `allocator`   - The BxDF allocator.
    /// * `reflectance` - Fraction of light reflected.
    pub fn alloc(allocator: &BxdfAllocator<'a>, reflectance: &'a dyn Reflector) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self { reflectance });
        allocator.allocate(Bxdf::SpecularReflection(model))
    }

    /// Returns the mirrored direction. Differentials are mirrored with it.
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
            hemisphere: Hemisphere::Brdf,
            reflectance: self.reflectance,
            direction: mirror(incoming),
            differentials: differentials.map(|d| d.map(mirror)),
            pdf: None,
        })
    }
}

/// Returns a mirror BRDF, or `None` if `reflectance` is absent.
///
/// * `allocator`   - The BxDF allocator.
/// * `reflectance` - Fraction of light reflected.
pub fn make_mirror_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
) -> Option<&'a Bxdf<'a>> {
    Some(SpecularReflection::alloc(allocator, reflectance?))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::{value, with_allocators};
    use crate::rng::RNG;

    #[test]
    fn mirrors_incoming_and_differentials() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_mirror_brdf(bxdfs, spectra.uniform(0.8)).unwrap();
            assert!(!bxdf.is_diffuse());

            let incoming = Vector3f::new(0.3, -0.4, 0.5);
            let differentials = Differentials::new(Vector3f::new(0.1, 0.2, 0.9), Vector3f::new(-0.2, 0.1, 0.9));
            let normal = Vector3f::new(0.0, 0.0, 1.0);
            let mut rng = RNG::new(0);
            let mut sampler = Sampler::new(&mut rng);

            match bxdf.sample(&incoming, Some(&differentials), &normal, &mut sampler, spectra) {
                SampleResult::Specular(s) => {
                    assert_eq!(s.hemisphere, Hemisphere::Brdf);
                    assert_eq!(s.direction, Vector3f::new(-0.3, 0.4, 0.5));
                    assert_eq!(s.pdf, None);
                    assert!((value(Some(s.reflectance)) - 0.8).abs() < 1e-6);

                    let d = s.differentials.unwrap();
                    assert_eq!(d.dx, Vector3f::new(-0.1, -0.2, 0.9));
                    assert_eq!(d.dy, Vector3f::new(0.2, -0.1, 0.9));
                }
                other => panic!("expected a specular sample, got {:?}", other),
            }
        });
    }

    #[test]
    fn never_evaluates_pointwise() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_mirror_brdf(bxdfs, Some(&PERFECT_REFLECTOR)).unwrap();
            let incoming = Vector3f::new(0.0, 0.6, 0.8);
            let outgoing = mirror(&incoming);
            assert_eq!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf), 0.0);
            assert!(bxdf.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra).is_none());
            assert!(make_mirror_brdf(bxdfs, None).is_none());
        });
    }
}
