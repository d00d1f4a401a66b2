//! Oren-Nayar Microfacet Model

use super::lambertian::cosine_sample;
use super::*;
use crate::sampling::*;

/// BRDF for rough diffuse surfaces modeled as V-shaped Lambertian
/// microfacets with a Gaussian slope distribution.
#[derive(Copy, Clone, Debug)]
pub struct OrenNayar<'a> {
    /// Fraction of incident light that is scattered.
    reflectance: &'a dyn Reflector,

    /// A = 1 - σ² / (2(σ² + 0.33)).
    a: Float,

    /// B = 0.45σ² / (σ² + 0.09).
    b: Float,
}

impl<'a> OrenNayar<'a> {
    /// Allocate a new `OrenNayar`.
    ///
    /// * `allocator`   - The BxDF allocator.
    /// * `reflectance` - Fraction of incident light that is scattered.
    /// * `sigma`       - Standard deviation of the microfacet orientation
    ///                   angle in degrees.
    pub fn alloc(allocator: &BxdfAllocator<'a>, reflectance: &'a dyn Reflector, sigma: Float) -> &'a Bxdf<'a> {
        let sigma = sigma.to_radians();
        let sigma2 = sigma * sigma;
        let model = allocator.allocate(Self {
            reflectance,
            a: 1.0 - (sigma2 / (2.0 * (sigma2 + 0.33))),
            b: 0.45 * sigma2 / (sigma2 + 0.09),
        });
        allocator.allocate(Bxdf::OrenNayar(model))
    }

    /// Samples a cosine-weighted reflected direction. Draws two sample values.
    ///
    /// * `incoming` - The incoming direction.
    /// * `sampler`  - Source of sample values.
    pub fn sample(&self, incoming: &Vector3f, sampler: &mut Sampler) -> Option<Vector3f> {
        cosine_sample(incoming, Hemisphere::Brdf, sampler)
    }

    /// Returns |cos θ|/π for reflection.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf(&self, _incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        match hemisphere {
            Hemisphere::Brdf => cosine_hemisphere_pdf(outgoing.z),
            Hemisphere::Btdf => 0.0,
        }
    }

    /// Returns the reflectance for a pair of directions.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance(
        &self,
        incoming: &Vector3f,
        outgoing: &Vector3f,
        hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        if hemisphere != Hemisphere::Brdf {
            return None;
        }

        let sin_theta_i = sin_theta(incoming);
        let sin_theta_o = sin_theta(outgoing);

        let max_cos = if sin_theta_i > 1e-4 && sin_theta_o > 1e-4 {
            let d_cos = cos_phi(incoming) * cos_phi(outgoing) + sin_phi(incoming) * sin_phi(outgoing);
            max(0.0, d_cos)
        } else {
            0.0
        };

        let abs_cos_theta_i = abs_cos_theta(incoming);
        let abs_cos_theta_o = abs_cos_theta(outgoing);
        let (sin_alpha, tan_beta) = if abs_cos_theta_i > abs_cos_theta_o {
            (sin_theta_o, sin_theta_i / abs_cos_theta_i)
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta_o)
        };

        let factor = INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta);
        allocator.unbounded_scale(Some(self.reflectance), factor)
    }
}

/// Returns an Oren-Nayar BRDF, or `None` if `reflectance` is absent or
/// `sigma` is not finite.
///
/// * `allocator`   - The BxDF allocator.
/// * `reflectance` - Fraction of incident light that is scattered.
/// * `sigma`       - Standard deviation of the microfacet orientation angle in
///                   degrees.
pub fn make_oren_nayar_brdf<'a>(
    allocator: &BxdfAllocator<'a>,
    reflectance: Option<&'a dyn Reflector>,
    sigma: Float,
) -> Option<&'a Bxdf<'a>> {
    if !sigma.is_finite() {
        debug!("Rejecting Oren-Nayar sigma {}", sigma);
        return None;
    }
    Some(OrenNayar::alloc(allocator, reflectance?, sigma))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::tests::{value, with_allocators};
    use proptest::prelude::*;

    #[test]
    fn rejects_invalid_input() {
        with_allocators(|bxdfs, spectra| {
            assert!(make_oren_nayar_brdf(bxdfs, None, 20.0).is_none());
            assert!(make_oren_nayar_brdf(bxdfs, spectra.uniform(0.5), Float::NAN).is_none());
            assert!(make_oren_nayar_brdf(bxdfs, spectra.uniform(0.5), INFINITY).is_none());
        });
    }

    #[test]
    fn rough_differs_from_lambertian() {
        with_allocators(|bxdfs, spectra| {
            let rough = make_oren_nayar_brdf(bxdfs, spectra.uniform(1.0), 30.0).unwrap();
            let incoming = Vector3f::new(0.6, 0.0, 0.8);
            let outgoing = Vector3f::new(0.0, 0.0, 1.0);
            let r = value(rough.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra));
            assert!(r > 0.0 && r < INV_PI);
        });
    }

    proptest! {
        #[test]
        fn zero_sigma_matches_lambertian(
            ix in -1.0..1.0f32, iy in -1.0..1.0f32, iz in 0.05..1.0f32,
            ox in -1.0..1.0f32, oy in -1.0..1.0f32, oz in 0.05..1.0f32,
        ) {
            with_allocators(|bxdfs, spectra| {
                let incoming = Vector3f::new(ix, iy, iz).normalize();
                let outgoing = Vector3f::new(ox, oy, oz).normalize();
                let lambertian = make_lambertian_brdf(bxdfs, spectra.uniform(0.8)).unwrap();
                let oren_nayar = make_oren_nayar_brdf(bxdfs, spectra.uniform(0.8), 0.0).unwrap();

                let a = value(lambertian.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra));
                let b = value(oren_nayar.reflectance_diffuse(&incoming, &outgoing, Hemisphere::Brdf, spectra));
                assert!((a - b).abs() < 1e-4);

                let pa = lambertian.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf);
                let pb = oren_nayar.pdf_diffuse(&incoming, &outgoing, Hemisphere::Brdf);
                assert!((pa - pb).abs() < 1e-6);
            });
        }
    }
}
