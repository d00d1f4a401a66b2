//! BxDF Samples

use super::*;

/// Which side of the surface a pair of directions spans. Both directions
/// point away from the surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    /// Both directions on the same side (reflection).
    Brdf,

    /// Directions on opposite sides (transmission).
    Btdf,
}

impl Hemisphere {
    /// Returns the hemisphere spanned by two shading-frame directions, or
    /// `None` if either lies in the tangent plane.
    ///
    /// * `incoming` - First direction.
    /// * `outgoing` - Second direction.
    pub fn between(incoming: &Vector3f, outgoing: &Vector3f) -> Option<Self> {
        Self::from_cosines(incoming.z, outgoing.z)
    }

    /// Returns the hemisphere spanned by two directions given their cosines
    /// with a normal, or `None` if either cosine is zero (or NaN).
    ///
    /// * `cos_incoming` - Cosine of the first direction.
    /// * `cos_outgoing` - Cosine of the second direction.
    pub fn from_cosines(cos_incoming: Float, cos_outgoing: Float) -> Option<Self> {
        let product = cos_incoming * cos_outgoing;
        if product > 0.0 {
            Some(Self::Brdf)
        } else if product < 0.0 {
            Some(Self::Btdf)
        } else {
            None
        }
    }
}

/// A direction sampled from a pointwise-evaluable lobe. Its PDF and
/// reflectance come from `Bxdf::pdf_diffuse()` and
/// `Bxdf::reflectance_diffuse()`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiffuseSample {
    /// The sampled direction, pointing away from the surface.
    pub direction: Vector3f,
}

/// A direction sampled from a delta lobe, carrying everything the caller
/// needs since the lobe cannot be evaluated pointwise.
#[derive(Copy, Clone, Debug)]
pub struct SpecularSample<'a> {
    /// Side of the sampled direction relative to the incoming direction.
    pub hemisphere: Hemisphere,

    /// Reflectance along the sampled direction.
    pub reflectance: &'a dyn Reflector,

    /// The sampled direction, pointing away from the surface.
    pub direction: Vector3f,

    /// Sampled directions of the offset rays, if differentials were given.
    pub differentials: Option<Differentials>,

    /// Probability of choosing this lobe among several, or `None` if it was
    /// the only choice.
    pub pdf: Option<Float>,
}

/// Result of `Bxdf::sample()`.
#[derive(Copy, Clone, Debug)]
pub enum SampleResult<'a> {
    /// No scattering for this sample.
    None,
    Diffuse(DiffuseSample),
    Specular(SpecularSample<'a>),
}

impl<'a> SampleResult<'a> {
    /// Returns the sampled direction, if any.
    pub fn direction(&self) -> Option<Vector3f> {
        match self {
            Self::None => None,
            Self::Diffuse(s) => Some(s.direction),
            Self::Specular(s) => Some(s.direction),
        }
    }

    /// Returns true if nothing was sampled.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<'a> From<Option<SpecularSample<'a>>> for SampleResult<'a> {
    fn from(sample: Option<SpecularSample<'a>>) -> Self {
        sample.map_or(Self::None, Self::Specular)
    }
}

impl<'a> From<Option<Vector3f>> for SampleResult<'a> {
    fn from(direction: Option<Vector3f>) -> Self {
        direction.map_or(Self::None, |direction| Self::Diffuse(DiffuseSample { direction }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hemisphere_between() {
        let up = Vector3f::new(0.0, 0.0, 1.0);
        let down = Vector3f::new(0.3, 0.0, -0.5);
        let flat = Vector3f::new(1.0, 0.0, 0.0);
        assert_eq!(Hemisphere::between(&up, &up), Some(Hemisphere::Brdf));
        assert_eq!(Hemisphere::between(&up, &down), Some(Hemisphere::Btdf));
        assert_eq!(Hemisphere::between(&down, &down), Some(Hemisphere::Brdf));
        assert_eq!(Hemisphere::between(&flat, &up), None);
        assert_eq!(Hemisphere::from_cosines(Float::NAN, 1.0), None);
    }
}
