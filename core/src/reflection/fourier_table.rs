//! Fourier BSDF Table

use crate::interpolation::*;
use crate::math::*;
use itertools::Itertools;
use thiserror::Error;

/// Errors raised while building or decoding a measured Fourier table.
#[derive(Error, Debug)]
pub enum FourierTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header {0:?}; expected SCATFUN\\x01")]
    BadHeader([u8; 8]),

    #[error("Unsupported layout: flags {flags}, {channels} channels, {bases} bases")]
    UnsupportedLayout { flags: i32, channels: usize, bases: usize },

    #[error("Inconsistent dimensions: {0}")]
    InconsistentDimensions(String),

    #[error("Elevation nodes are not strictly increasing")]
    NonMonotonic,
}

/// Measured scattering data stored as Fourier cosine series in the azimuth
/// difference, tabulated over pairs of elevation cosines.
///
/// Cells are indexed by `o * mu.len() + i` where `o` selects the cosine of
/// the fixed direction and `i` the cosine of the scattered one. With three
/// channels each cell holds luminance, red and blue series back to back.
#[derive(Clone, Debug)]
pub struct FourierTable {
    /// Relative index of refraction across the interface.
    eta: Float,

    /// Largest series order of any cell.
    m_max: usize,

    /// 1 for luminance only, 3 for luminance, red and blue.
    channels: usize,

    /// Elevation cosines in increasing order.
    mu: Vec<Float>,

    /// Series order of each cell.
    m: Vec<usize>,

    /// Offset of each cell's coefficients in `a`.
    a_offset: Vec<usize>,

    /// All coefficients.
    a: Vec<Float>,

    /// Constant term of each cell's luminance series.
    a0: Vec<Float>,

    /// Running integral of `a0` along each row.
    cdf: Vec<Float>,

    /// `recip[k] = 1/k`, with `recip[0] = 0`.
    recip: Vec<Float>,
}

impl FourierTable {
    /// Create a new `FourierTable` from cells packed back to back. The
    /// marginal CDF is integrated from the constant terms.
    ///
    /// * `eta`          - Relative index of refraction across the interface.
    /// * `channels`     - 1 or 3.
    /// * `mu`           - Elevation cosines, strictly increasing.
    /// * `orders`       - Series order of each of the `mu.len()²` cells.
    /// * `coefficients` - Coefficients of every cell, `channels * order` each.
    pub fn new(
        eta: Float,
        channels: usize,
        mu: Vec<Float>,
        orders: Vec<usize>,
        coefficients: Vec<Float>,
    ) -> Result<Self, FourierTableError> {
        let n = mu.len();
        if orders.len() != n * n {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "{} orders for {} elevation nodes",
                orders.len(),
                n
            )));
        }

        let offsets: Vec<usize> = orders
            .iter()
            .scan(0, |offset, order| {
                let start = *offset;
                *offset += channels * order;
                Some(start)
            })
            .collect();
        let total: usize = orders.iter().map(|order| channels * order).sum();
        if total != coefficients.len() {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "{} coefficients; cells need {}",
                coefficients.len(),
                total
            )));
        }

        let m_max = orders.iter().copied().max().unwrap_or(0);
        Self::from_parts(eta, channels, m_max, mu, None, orders, offsets, coefficients)
    }

    /// Validates the table layout and builds the derived arrays. The CDF is
    /// integrated when not supplied.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn from_parts(
        eta: Float,
        channels: usize,
        m_max: usize,
        mu: Vec<Float>,
        cdf: Option<Vec<Float>>,
        m: Vec<usize>,
        a_offset: Vec<usize>,
        a: Vec<Float>,
    ) -> Result<Self, FourierTableError> {
        let n = mu.len();
        if channels != 1 && channels != 3 {
            return Err(FourierTableError::UnsupportedLayout {
                flags: 1,
                channels,
                bases: 1,
            });
        }
        if n < 2 {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "{} elevation nodes; need at least 2",
                n
            )));
        }
        if !mu.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(FourierTableError::NonMonotonic);
        }
        if !(eta.is_finite() && eta > 0.0) {
            return Err(FourierTableError::InconsistentDimensions(format!("eta {}", eta)));
        }
        if m.len() != n * n || a_offset.len() != n * n {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "{} orders and {} offsets for {} elevation nodes",
                m.len(),
                a_offset.len(),
                n
            )));
        }
        for (order, offset) in m.iter().zip(a_offset.iter()) {
            if *order > m_max || offset + channels * order > a.len() {
                return Err(FourierTableError::InconsistentDimensions(format!(
                    "cell at {} of order {} exceeds {} coefficients (m_max {})",
                    offset,
                    order,
                    a.len(),
                    m_max
                )));
            }
        }

        // Every order up to m_max must be backed by at least one coefficient.
        if m_max > a.len() {
            return Err(FourierTableError::InconsistentDimensions(format!(
                "m_max {} exceeds {} coefficients",
                m_max,
                a.len()
            )));
        }

        let a0: Vec<Float> = m
            .iter()
            .zip(a_offset.iter())
            .map(|(order, offset)| if *order > 0 { a[*offset] } else { 0.0 })
            .collect();

        let cdf = match cdf {
            Some(cdf) if cdf.len() == n * n => cdf,
            Some(cdf) => {
                return Err(FourierTableError::InconsistentDimensions(format!(
                    "{} CDF entries for {} elevation nodes",
                    cdf.len(),
                    n
                )))
            }
            None => a0
                .chunks(n)
                .flat_map(|row| integrate_catmull_rom(&mu, row).0)
                .collect(),
        };

        let recip = (0..m_max)
            .map(|k| if k == 0 { 0.0 } else { 1.0 / k as Float })
            .collect();

        Ok(Self {
            eta,
            m_max,
            channels,
            mu,
            m,
            a_offset,
            a,
            a0,
            cdf,
            recip,
        })
    }

    /// Returns the relative index of refraction across the interface.
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Returns the largest series order.
    pub fn m_max(&self) -> usize {
        self.m_max
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the elevation nodes.
    pub fn mu(&self) -> &[Float] {
        &self.mu
    }

    /// Returns `1/k` for each order `k`.
    pub(super) fn recip(&self) -> &[Float] {
        &self.recip
    }

    /// Interpolates the series of the first `channels` channels at a pair of
    /// cosines into `ak`, channel `c` starting at `c * m_max`. `ak` must be
    /// zeroed and hold `channels * m_max` values. Returns the largest order
    /// touched, or `None` if a cosine is out of range.
    ///
    /// * `mu_i`     - Cosine of the scattered direction.
    /// * `mu_o`     - Cosine of the fixed direction.
    /// * `channels` - Number of channels to interpolate.
    /// * `ak`       - Output coefficients.
    pub(super) fn interpolate_ak(&self, mu_i: Float, mu_o: Float, channels: usize, ak: &mut [Float]) -> Option<usize> {
        let (weights_i, offset_i) = catmull_rom_weights(&self.mu, mu_i)?;
        let (weights_o, offset_o) = catmull_rom_weights(&self.mu, mu_o)?;
        let n = self.mu.len();

        let mut order = 0;
        for (b, weight_o) in weights_o.iter().enumerate() {
            for (a, weight_i) in weights_i.iter().enumerate() {
                let weight = weight_i * weight_o;
                if weight == 0.0 {
                    continue;
                }

                let cell = (offset_o + b as isize) as usize * n + (offset_i + a as isize) as usize;
                let (m, offset) = (self.m[cell], self.a_offset[cell]);
                order = max(order, m);
                for c in 0..channels {
                    for k in 0..m {
                        ak[c * self.m_max + k] += weight * self.a[offset + c * m + k];
                    }
                }
            }
        }

        Some(order)
    }

    /// Samples the cosine of the scattered direction from the marginal
    /// density of the constant terms. Returns `None` if `mu_o` is out of
    /// range or the row carries no energy.
    ///
    /// * `mu_o` - Cosine of the fixed direction.
    /// * `u`    - Uniform sample value.
    pub(super) fn sample_mu(&self, mu_o: Float, u: Float) -> Option<Float> {
        sample_catmull_rom_2d(&self.mu, &self.mu, &self.a0, &self.cdf, mu_o, u).map(|(mu_i, _, _)| mu_i)
    }

    /// Returns the total of the constant terms over the sphere for a fixed
    /// direction, or 0 if `mu_o` is out of range.
    ///
    /// * `mu_o` - Cosine of the fixed direction.
    pub(super) fn rho(&self, mu_o: Float) -> Float {
        let Some((weights, offset)) = catmull_rom_weights(&self.mu, mu_o) else {
            return 0.0;
        };
        let n = self.mu.len();

        weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(o, w)| w * self.cdf[(offset + o as isize) as usize * n + n - 1] * TWO_PI)
            .sum()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
