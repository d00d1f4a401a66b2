//! Fourier Basis BSDF Model

use super::*;
use crate::interpolation::*;

/// Reflectors that the interpolated channels scale.
#[derive(Copy, Clone, Debug)]
enum Bases<'a> {
    /// Luminance only.
    Luminance(&'a dyn Reflector),

    /// Red, green and blue; the table carries luminance, red and blue.
    Rgb([&'a dyn Reflector; 3]),
}

/// Measured scattering from a tabulated Fourier series. Covers both
/// reflection and transmission.
#[derive(Copy, Clone, Debug)]
pub struct FourierBxdf<'a> {
    /// The measured data.
    table: &'a FourierTable,

    /// Reflectors scaled by the interpolated channels.
    bases: Bases<'a>,
}

impl<'a> FourierBxdf<'a> {
    /// Allocate a new `FourierBxdf`.
    ///
    /// * `allocator` - The BxDF allocator.
    /// * `table`     - The measured data.
    /// * `bases`     - Reflectors scaled by the interpolated channels.
    fn alloc(allocator: &BxdfAllocator<'a>, table: &'a FourierTable, bases: Bases<'a>) -> &'a Bxdf<'a> {
        let model = allocator.allocate(Self { table, bases });
        allocator.allocate(Bxdf::Fourier(model))
    }

    /// Returns the elevation cosines of the scattered and fixed directions
    /// and the cosine of their azimuth difference.
    fn cosines(incoming: &Vector3f, outgoing: &Vector3f) -> (Float, Float, f64) {
        let flipped = -*outgoing;
        (cos_theta(&flipped), cos_theta(incoming), cos_d_phi(&flipped, incoming) as f64)
    }

    /// Samples the elevation from the marginal constant terms and the azimuth
    /// from the luminance series. Draws two sample values, elevation first.
    ///
    /// * `incoming`  - The incoming direction.
    /// * `sampler`   - Source of sample values.
    /// * `allocator` - The spectral allocator, for scratch space.
    pub fn sample(
        &self,
        incoming: &Vector3f,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<Vector3f> {
        if incoming.z == 0.0 {
            return None;
        }

        let mu_o = cos_theta(incoming);
        let u_mu = sampler.next();
        let u_phi = sampler.next();

        let mu_i = self.table.sample_mu(mu_o, u_mu)?;

        let ak = allocator.scratch(self.table.m_max());
        let order = self.table.interpolate_ak(mu_i, mu_o, 1, ak)?;
        if order == 0 || !(ak[0] > 0.0) {
            return None;
        }
        let (_, _, phi) = sample_fourier(&ak[..order], self.table.recip(), u_phi);

        let sin_2_theta_i = max(0.0, 1.0 - mu_i * mu_i);
        let norm = (sin_2_theta_i / sin_2_theta(incoming)).sqrt();
        let norm = if norm.is_finite() { norm } else { 0.0 };

        let (sin_phi, cos_phi) = phi.sin_cos();
        let outgoing = -Vector3f::new(
            norm * (cos_phi * incoming.x - sin_phi * incoming.y),
            norm * (sin_phi * incoming.x + cos_phi * incoming.y),
            mu_i,
        );

        // Renormalize; rounding lets the length drift.
        if outgoing.z == 0.0 {
            None
        } else {
            Some(outgoing.normalize())
        }
    }

    /// Returns the density of sampling `outgoing`.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried; both are supported.
    pub fn pdf(&self, incoming: &Vector3f, outgoing: &Vector3f, _hemisphere: Hemisphere) -> Float {
        let (mu_i, mu_o, cos_phi) = Self::cosines(incoming, outgoing);

        let mut ak = vec![0.0; self.table.m_max()];
        let Some(order) = self.table.interpolate_ak(mu_i, mu_o, 1, &mut ak) else {
            return 0.0;
        };

        let rho = self.table.rho(mu_o);
        let y = fourier(&ak[..order], cos_phi);
        if rho > 0.0 && y > 0.0 {
            y / rho
        } else {
            0.0
        }
    }

    /// Returns the interpolated reflectance for a pair of directions.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried; both are supported.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance(
        &self,
        incoming: &Vector3f,
        outgoing: &Vector3f,
        _hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        let (mu_i, mu_o, cos_phi) = Self::cosines(incoming, outgoing);

        let channels = match self.bases {
            Bases::Luminance(_) => 1,
            Bases::Rgb(_) => 3,
        };
        let m_max = self.table.m_max();
        let ak = allocator.scratch(channels * m_max);
        let order = self.table.interpolate_ak(mu_i, mu_o, channels, ak)?;

        let y = max(0.0, fourier(&ak[..order], cos_phi));

        let mut scale = if mu_i != 0.0 { 1.0 / abs(mu_i) } else { 0.0 };
        if mu_i * mu_o > 0.0 {
            // Transmission compresses radiance by the relative index.
            let eta = if mu_i > 0.0 {
                1.0 / self.table.eta()
            } else {
                self.table.eta()
            };
            scale *= eta * eta;
        }

        match self.bases {
            Bases::Luminance(basis) => allocator.unbounded_scale(Some(basis), y * scale),
            Bases::Rgb([red, green, blue]) => {
                let r = fourier(&ak[m_max..m_max + order], cos_phi);
                let b = fourier(&ak[2 * m_max..2 * m_max + order], cos_phi);
                let g = 1.39829 * y - 0.100913 * b - 0.297375 * r;

                [(red, r), (green, g), (blue, b)]
                    .iter()
                    .fold(None, |sum, (basis, value)| {
                        allocator.unbounded_add(sum, allocator.unbounded_scale(Some(*basis), value * scale))
                    })
            }
        }
    }
}

/// Returns a measured BSDF using the table's luminance channel.
///
/// * `allocator` - The BxDF allocator.
/// * `table`     - The measured data.
pub fn make_fourier_bxdf<'a>(allocator: &BxdfAllocator<'a>, table: &'a FourierTable) -> Option<&'a Bxdf<'a>> {
    Some(FourierBxdf::alloc(allocator, table, Bases::Luminance(&PERFECT_REFLECTOR)))
}

/// Returns a measured BSDF that scales a reflector per color channel, or
/// `None` if the table has no color channels or a basis is absent.
///
/// * `allocator` - The BxDF allocator.
/// * `table`     - The measured data.
/// * `red`       - Reflector scaled by the red channel.
/// * `green`     - Reflector scaled by the reconstructed green channel.
/// * `blue`      - Reflector scaled by the blue channel.
pub fn make_fourier_bxdf_rgb<'a>(
    allocator: &BxdfAllocator<'a>,
    table: &'a FourierTable,
    red: Option<&'a dyn Reflector>,
    green: Option<&'a dyn Reflector>,
    blue: Option<&'a dyn Reflector>,
) -> Option<&'a Bxdf<'a>> {
    if table.channels() != 3 {
        debug!("Fourier table has {} channel(s); color needs 3", table.channels());
        return None;
    }
    let bases = Bases::Rgb([red?, green?, blue?]);
    Some(FourierBxdf::alloc(allocator, table, bases))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
