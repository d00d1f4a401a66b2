//! Composite Scattering

use super::*;

/// Mixture of several scattering functions. Children are stored with the
/// diffuse ones first, so the diffuse partition is `bxdfs[..num_diffuse]`.
#[derive(Copy, Clone, Debug)]
pub struct Composite<'a> {
    /// The children, diffuse first.
    bxdfs: &'a [&'a Bxdf<'a>],

    /// Number of diffuse children at the front of `bxdfs`.
    num_diffuse: usize,
}

impl<'a> Composite<'a> {
    /// Allocate a new `Composite`, partitioning `bxdfs` stably in place so
    /// the diffuse children come first.
    ///
    /// * `allocator` - The BxDF allocator.
    /// * `bxdfs`     - The children, already in the arena.
    pub(super) fn alloc(allocator: &BxdfAllocator<'a>, bxdfs: &'a mut [&'a Bxdf<'a>]) -> &'a Bxdf<'a> {
        bxdfs.sort_by_key(|bxdf| !bxdf.is_diffuse());
        let num_diffuse = bxdfs.iter().take_while(|bxdf| bxdf.is_diffuse()).count();

        let bxdfs: &'a [&'a Bxdf<'a>] = bxdfs;
        let model = allocator.allocate(Self { bxdfs, num_diffuse });
        allocator.allocate(Bxdf::Composite(model))
    }

    /// Returns the children, diffuse first.
    pub fn bxdfs(&self) -> &'a [&'a Bxdf<'a>] {
        self.bxdfs
    }

    /// Returns the diffuse partition.
    fn diffuse(&self) -> &'a [&'a Bxdf<'a>] {
        &self.bxdfs[..self.num_diffuse]
    }

    /// Returns the mean of the diffuse children's weights.
    pub fn diffuse_pdf(&self) -> Option<Float> {
        let diffuse = self.diffuse();
        if diffuse.is_empty() {
            return None;
        }

        let total: Float = diffuse.iter().filter_map(|bxdf| bxdf.diffuse_pdf()).sum();
        Some(total / diffuse.len() as Float)
    }

    /// Samples a uniformly chosen child. A specular child's pdf is divided by
    /// the number of children.
    ///
    /// * `incoming`      - The incoming direction.
    /// * `differentials` - Optional directions of offset rays.
    /// * `sampler`       - Source of sample values.
    /// * `allocator`     - The spectral allocator.
    pub fn sample(
        &self,
        incoming: &Vector3f,
        differentials: Option<&Differentials>,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> SampleResult<'a> {
        let n = self.bxdfs.len();
        if n == 0 {
            return SampleResult::None;
        }
        let bxdf = self.bxdfs[sampler.next_index(n)];

        match bxdf.sample_unchecked(incoming, differentials, sampler, allocator) {
            SampleResult::Specular(sample) => SampleResult::Specular(SpecularSample {
                pdf: Some(sample.pdf.unwrap_or(1.0) / n as Float),
                ..sample
            }),
            result => result,
        }
    }

    /// Samples a uniformly chosen diffuse child.
    ///
    /// * `incoming`  - The incoming direction.
    /// * `sampler`   - Source of sample values.
    /// * `allocator` - The spectral allocator.
    pub fn sample_diffuse(
        &self,
        incoming: &Vector3f,
        sampler: &mut Sampler,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<Vector3f> {
        let diffuse = self.diffuse();
        if diffuse.is_empty() {
            return None;
        }

        diffuse[sampler.next_index(diffuse.len())].sample_diffuse(incoming, sampler, allocator)
    }

    /// Returns the mean density of the diffuse children.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    pub fn pdf_diffuse(&self, incoming: &Vector3f, outgoing: &Vector3f, hemisphere: Hemisphere) -> Float {
        let diffuse = self.diffuse();
        if diffuse.is_empty() {
            return 0.0;
        }

        let total: Float = diffuse
            .iter()
            .map(|bxdf| bxdf.pdf_diffuse(incoming, outgoing, hemisphere))
            .sum();
        total / diffuse.len() as Float
    }

    /// Returns the sum of the diffuse children's reflectances.
    ///
    /// * `incoming`   - The incoming direction.
    /// * `outgoing`   - The scattered direction.
    /// * `hemisphere` - The hemisphere being queried.
    /// * `allocator`  - The spectral allocator.
    pub fn reflectance_diffuse(
        &self,
        incoming: &Vector3f,
        outgoing: &Vector3f,
        hemisphere: Hemisphere,
        allocator: &SpectralAllocator<'a>,
    ) -> Option<&'a dyn Reflector> {
        self.diffuse().iter().fold(None, |sum, bxdf| {
            allocator.unbounded_add(sum, bxdf.reflectance_diffuse(incoming, outgoing, hemisphere, allocator))
        })
    }
}

/// Returns a mixture of the present `bxdfs`. Absent entries are dropped; no
/// entries left yields `None` and a single entry is returned unwrapped.
///
/// * `allocator` - The BxDF allocator.
/// * `bxdfs`     - Handles that may be absent.
pub fn make_composite_bxdf<'a>(
    allocator: &BxdfAllocator<'a>,
    bxdfs: &[Option<&'a Bxdf<'a>>],
) -> Option<&'a Bxdf<'a>> {
    let children = allocator.allocate_list(bxdfs);
    match children.len() {
        0 => None,
        1 => Some(children[0]),
        _ => Some(Composite::alloc(allocator, children)),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
