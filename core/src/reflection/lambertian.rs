//! Lambertian Reflection and Transmission

use super::*;
use crate::sampling::*;

/// Ideal diffuse scattering into one hemisphere: reflection for a BRDF,
/// transmission to the opposite side for a BTDF.
#[derive(Copy, Clone, Debug)]
pub struct Lambertian<'a> {
    /// Fraction of incident light that is scattered.
    reflectance: &'a dyn Reflector,

    /// The side light is scattered to.
    hemisphere: Hemisphere,
}

impl<'a> Lambertian<'a> {
    /// Allocate a new `Lambertian`.
    ///
    /// * `allocator`   - The BxDF allocator.
    /// * `reflectance` - Fraction of incident light that is scattered.
    /// * `hemisphere`  - The side light is scattered to.
    pub fn alloc(
        allocator: &BxdfAllocator<'a>,
        reflectance: &'a dyn Reflector,
        hemisphere: Hemisphere,
    ) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self {
            reflectance,
            hemisphere,
        });
        allocator.allocate(Bxdf::Lambertian(model))
    }

    /// Samples a cosine-weighted direction on this model's side.
    ///
    /// Draws two sample values.
    ///
    /// * `incoming` - The incoming direction.
    /// * `sampler`  - Source of sample values.
    pub fn sample(&self, incoming: &Vector3f, sampler: &mut Sampler) -> Option<Vector3f> {
        cosine_sample(incoming, self.hemisphere, sampler)
    }

    /// Returns |cos θ|/π for the model's side.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf(&self, _incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        if hemisphere != self.hemisphere {
            return 0.0;
        }
        cosine_hemisphere_pdf(outgoing.z)
    }

    /// Returns ρ/π for the model's side.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance(
        &self,
        _incoming: &Vector3f,
        _outgoing: &Vector3f,
        hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        if hemisphere != self.hemisphere {
            return None;
        }
        allocator.scale(Some(self.reflectance), INV_PI)
    }
}

/// Samples a cosine-weighted direction on the side of `incoming` selected by
/// `hemisphere`. Draws two sample values, x first.
///
/// * `incoming`   - The incoming direction.
/// * `hemisphere` - The side to sample.
/// * `sampler`    - Source of sample values.
pub(super) fn cosine_sample(
    incoming: &Vector3f,
    hemisphere: Hemisphere,
    sampler: &mut Sampler,
) -> Option<Vector3f> {
    if incoming.z == 0.0 {
        return None;
    }

    let mut outgoing = cosine_sample_hemisphere(&sampler.next_2d());
    let flip = match hemisphere {
        Hemisphere::Brdf => incoming.z < 0.0,
        Hemisphere::Btdf => incoming.z > 0.0,
    };
    if flip {
        outgoing.z = -outgoing.z;
    }
    Some(outgoing)
}

/// Returns a Lambertian BRDF, or `None` if `reflectance` is absent.
///
/// * `allocator`   - The BxDF allocator.
/// * `reflectance` - Fraction of incident light that is reflected.
pub fn make_lambertian_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
) -> Option<&'a Bxdf<'a>> {
    Some(Lambertian::alloc(allocator, reflectance?, Hemisphere::Brdf))
}

/// Returns a Lambertian BTDF, or `None` if `transmittance` is absent.
///
/// * `allocator`     - The BxDF allocator.
/// * `transmittance` - Fraction of incident light that is transmitted.
pub fn make_lambertian_btdf<'a>(
    allocator: &BxdfAllocator<'a>,
    transmittance: Option<&'a dyn Reflector>,
) -> Option<&'a Bxdf<'a>> {
    Some(Lambertian::alloc(allocator, transmittance?, Hemisphere::Btdf))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::{value, with_allocators};
    use crate::rng::RNG;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn absent_reflectance_is_absent() {
        with_allocators(|bxdfs, _| {
            assert!(make_lambertian_brdf(bxdfs, None).is_none());
            assert!(make_lambertian_btdf(bxdfs, None).is_none());
        });
    }

    #[test]
    fn brdf_reflectance_is_one_over_pi() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_lambertian_brdf(bxdfs, spectra.uniform(1.0)).unwrap();
            let incoming = Vector3f::new(0.0, 0.0, 1.0);
            let outgoing = Vector3f::new(0.6, 0.0, 0.8);
            let r = bxdf.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra);
            assert!(approx_eq!(Float, value(r), 0.31831, epsilon = 1e-5));
            assert!(approx_eq!(
                Float,
                bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf),
                0.8 * INV_PI,
                epsilon = 1e-6
            ));
            assert_eq!(bxdf.diffuse_pdf(), Some(1.0));
        });
    }

    #[test]
    fn btdf_samples_opposite_side() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_lambertian_btdf(bxdfs, spectra.uniform(0.5)).unwrap();
            let incoming = Vector3f::new(0.0, 0.6, 0.8);
            let normal = Vector3f::new(0.0, 0.0, 1.0);
            let mut rng = RNG::new(17);
            let mut sampler = Sampler::new(&mut rng);
            for _ in 0..16 {
                let outgoing = bxdf.sample(&incoming, None, &normal, &mut sampler, spectra).direction().unwrap();
                assert!(outgoing.z < 0.0);
                assert!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Btdf) > 0.0);
                assert_eq!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf), 0.0);
            }
        });
    }

    #[test]
    fn tangent_incoming_samples_nothing() {
        with_allocators(|bxdfs, spectra| {
            let bxdf = make_lambertian_brdf(bxdfs, spectra.uniform(0.5)).unwrap();
            let mut rng = RNG::new(1);
            let mut sampler = Sampler::new(&mut rng);
            assert!(bxdf
                .sample_diffuse(&Vector3f::new(1.0, 0.0, 0.0), &mut sampler, spectra)
                .is_none());
        });
    }

    proptest! {
        #[test]
        fn brdf_pdf_btdf_is_zero(
            x in -1.0..1.0f32, y in -1.0..1.0f32, z in -1.0..1.0f32,
            ox in -1.0..1.0f32, oy in -1.0..1.0f32, oz in -1.0..1.0f32,
        ) {
            with_allocators(|bxdfs, spectra| {
                let bxdf = make_lambertian_brdf(bxdfs, spectra.uniform(1.0)).unwrap();
                let incoming = Vector3f::new(x, y, z);
                let outgoing = Vector3f::new(ox, oy, oz);
                assert_eq!(bxdf.pdf_diffuse(&incoming, &outgoing, Hemisphere::Btdf), 0.0);
            });
        }
    }
}
