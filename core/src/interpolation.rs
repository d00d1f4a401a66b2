//! Interpolation
//!
//! Catmull-Rom splines over non-uniform nodes and Fourier cosine series, with
//! the sampling routines used by measured scattering data.

use crate::math::*;

/// Convergence tolerance of the Newton-bisection solvers.
const TOLERANCE: Float = 1e-6;

/// Finite difference approximations of the spline derivatives at both ends of
/// segment `i`, scaled to the segment width.
///
/// * `nodes` - Spline nodes.
/// * `value` - Returns the function value at a node index.
/// * `i`     - Segment index.
fn segment_slopes<V>(nodes: &[Float], value: V, i: usize) -> (Float, Float)
where
    V: Fn(usize) -> Float,
{
    let n = nodes.len();
    let (x0, x1) = (nodes[i], nodes[i + 1]);
    let (f0, f1) = (value(i), value(i + 1));
    let width = x1 - x0;

    let d0 = if i > 0 {
        width * (f1 - value(i - 1)) / (x1 - nodes[i - 1])
    } else {
        f1 - f0
    };
    let d1 = if i + 2 < n {
        width * (value(i + 2) - f0) / (nodes[i + 2] - x0)
    } else {
        f1 - f0
    };
    (d0, d1)
}

/// Solves `F(t) = u` on `[0, 1]` where `F` is the definite integral of the
/// cubic Hermite segment `(f0, f1, d0, d1)`. Returns `t` and the segment value
/// at `t`.
///
/// * `f0` - Value at the segment start.
/// * `f1` - Value at the segment end.
/// * `d0` - Scaled derivative at the segment start.
/// * `d1` - Scaled derivative at the segment end.
/// * `u`  - Target integral value.
#[allow(non_snake_case)]
fn invert_segment_integral(f0: Float, f1: Float, d0: Float, d1: Float, u: Float) -> (Float, Float) {
    // Initial guess from importance sampling the linear interpolant.
    let mut t = if f0 != f1 {
        (f0 - max(0.0, f0 * f0 + 2.0 * u * (f1 - f0)).sqrt()) / (f0 - f1)
    } else {
        u / f0
    };

    let (mut a, mut b): (Float, Float) = (0.0, 1.0);
    loop {
        if !(t >= a && t <= b) {
            t = 0.5 * (a + b);
        }

        // Integral and its derivative in Horner form.
        let Fhat = t
            * (f0
                + t * (0.5 * d0
                    + t * ((1.0 / 3.0) * (-2.0 * d0 - d1) + f1 - f0
                        + t * (0.25 * (d0 + d1) + 0.5 * (f0 - f1)))));
        let fhat = f0
            + t * (d0 + t * (-2.0 * d0 - d1 + 3.0 * (f1 - f0) + t * (d0 + d1 + 2.0 * (f0 - f1))));

        if abs(Fhat - u) < TOLERANCE || b - a < TOLERANCE {
            return (t, fhat);
        }

        if Fhat - u < 0.0 {
            a = t;
        } else {
            b = t;
        }

        t -= (Fhat - u) / fhat;
    }
}

/// Returns the four spline weights for `x` and the offset of the node the
/// first weight applies to. The offset is -1 when `x` lies in the first
/// segment; the first weight is then zero. Returns `None` when `x` lies
/// outside the nodes.
///
/// * `nodes` - Spline nodes in increasing order (at least 2).
/// * `x`     - Position to interpolate at.
pub fn catmull_rom_weights(nodes: &[Float], x: Float) -> Option<([Float; 4], isize)> {
    let size = nodes.len();
    if size < 2 || !(x >= nodes[0] && x <= nodes[size - 1]) {
        return None;
    }

    let idx = find_interval(size, |i| nodes[i] <= x);
    let offset = idx as isize - 1;
    let (x0, x1) = (nodes[idx], nodes[idx + 1]);

    let t = (x - x0) / (x1 - x0);
    let t2 = t * t;
    let t3 = t2 * t;

    let mut weights = [0.0; 4];
    weights[1] = 2.0 * t3 - 3.0 * t2 + 1.0;
    weights[2] = -2.0 * t3 + 3.0 * t2;

    if idx > 0 {
        let w0 = (t3 - 2.0 * t2 + t) * (x1 - x0) / (x1 - nodes[idx - 1]);
        weights[0] = -w0;
        weights[2] += w0;
    } else {
        let w0 = t3 - 2.0 * t2 + t;
        weights[1] -= w0;
        weights[2] += w0;
    }

    if idx + 2 < size {
        let w3 = (t3 - t2) * (x1 - x0) / (nodes[idx + 2] - x0);
        weights[1] -= w3;
        weights[3] = w3;
    } else {
        let w3 = t3 - t2;
        weights[1] -= w3;
        weights[2] += w3;
    }

    Some((weights, offset))
}

/// Samples the second dimension of a 2-D function tabulated on a spline grid
/// after interpolating the first dimension at `alpha`. Returns the sampled
/// position, the function value there and its PDF, or `None` when `alpha`
/// lies outside `nodes1`.
///
/// * `nodes1` - Nodes of the first dimension.
/// * `nodes2` - Nodes of the second dimension.
/// * `values` - Function values, row-major with `nodes2.len()` columns.
/// * `cdf`    - Per-row running integrals from `integrate_catmull_rom()`.
/// * `alpha`  - Position in the first dimension.
/// * `u`      - Uniform sample value.
pub fn sample_catmull_rom_2d(
    nodes1: &[Float],
    nodes2: &[Float],
    values: &[Float],
    cdf: &[Float],
    alpha: Float,
    u: Float,
) -> Option<(Float, Float, Float)> {
    let size2 = nodes2.len();
    let (weights, offset) = catmull_rom_weights(nodes1, alpha)?;

    // Blends a column of the table across the rows selected by `alpha`.
    let interpolate = |array: &[Float], idx: usize| -> Float {
        weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(i, w)| array[(offset + i as isize) as usize * size2 + idx] * w)
            .sum()
    };

    let maximum = interpolate(cdf, size2 - 1);
    if !(maximum > 0.0) {
        return None;
    }
    let u = u * maximum;
    let idx = find_interval(size2, |i| interpolate(cdf, i) <= u);

    let (f0, f1) = (interpolate(values, idx), interpolate(values, idx + 1));
    let (x0, x1) = (nodes2[idx], nodes2[idx + 1]);
    let width = x1 - x0;
    let (d0, d1) = segment_slopes(nodes2, |i| interpolate(values, i), idx);

    let u = (u - interpolate(cdf, idx)) / width;
    let (t, fhat) = invert_segment_integral(f0, f1, d0, d1, u);

    Some((x0 + width * t, fhat, fhat / maximum))
}

/// Integrates a Catmull-Rom spline. Returns the running integral at each node
/// (starting at 0) and the total.
///
/// * `nodes`  - Spline nodes in increasing order.
/// * `values` - Function value at each node.
pub fn integrate_catmull_rom(nodes: &[Float], values: &[Float]) -> (Vec<Float>, Float) {
    let n = nodes.len();
    let mut sum = 0.0;
    let mut cdf = vec![0.0; n];

    for i in 0..n.saturating_sub(1) {
        let (f0, f1) = (values[i], values[i + 1]);
        let width = nodes[i + 1] - nodes[i];
        let (d0, d1) = segment_slopes(nodes, |j| values[j], i);

        sum += ((d0 - d1) * (1.0 / 12.0) + (f0 + f1) * 0.5) * width;
        cdf[i + 1] = sum;
    }

    (cdf, sum)
}

/// Evaluates the Fourier cosine series `Σ a_k cos(kφ)` in double precision
/// using the cosine recurrence.
///
/// * `a`       - Series coefficients.
/// * `cos_phi` - cos(φ).
pub fn fourier(a: &[Float], cos_phi: f64) -> Float {
    let mut value = 0.0_f64;

    let mut cos_k_minus_one_phi = cos_phi;
    let mut cos_k_phi = 1.0_f64;
    for ak in a {
        value += *ak as f64 * cos_k_phi;
        let cos_k_plus_one_phi = 2.0 * cos_phi * cos_k_phi - cos_k_minus_one_phi;
        cos_k_minus_one_phi = cos_k_phi;
        cos_k_phi = cos_k_plus_one_phi;
    }

    value as Float
}

/// Samples an azimuth from the Fourier series by Newton-bisection inversion
/// of its integral. Returns the series value, the PDF and the angle φ in
/// `[0, 2π)`.
///
/// * `ak`    - Series coefficients; `ak[0]` must be positive.
/// * `recip` - `recip[k] = 1/k` for every `k` in `1..ak.len()`.
/// * `u`     - Uniform sample value.
#[allow(non_snake_case)]
pub fn sample_fourier(ak: &[Float], recip: &[Float], u: Float) -> (Float, Float, Float) {
    // The series is even, so sample half the circle and pick a side.
    let flip = u >= 0.5;
    let u = if flip { 1.0 - 2.0 * (u - 0.5) } else { u * 2.0 };

    let (mut a, mut b) = (0.0_f64, PI as f64);
    let mut phi = 0.5 * PI as f64;
    let mut f: f64;
    loop {
        let cos_phi = phi.cos();
        let sin_phi = max(0.0, 1.0 - cos_phi * cos_phi).sqrt();
        let (mut cos_phi_prev, mut cos_phi_cur) = (cos_phi, 1.0_f64);
        let (mut sin_phi_prev, mut sin_phi_cur) = (-sin_phi, 0.0_f64);

        let mut F = ak[0] as f64 * phi;
        f = ak[0] as f64;
        for k in 1..ak.len() {
            let sin_phi_next = 2.0 * cos_phi * sin_phi_cur - sin_phi_prev;
            let cos_phi_next = 2.0 * cos_phi * cos_phi_cur - cos_phi_prev;
            sin_phi_prev = sin_phi_cur;
            sin_phi_cur = sin_phi_next;
            cos_phi_prev = cos_phi_cur;
            cos_phi_cur = cos_phi_next;

            F += ak[k] as f64 * recip[k] as f64 * sin_phi_next;
            f += ak[k] as f64 * cos_phi_next;
        }
        F -= (u * ak[0] * PI) as f64;

        if F > 0.0 {
            b = phi;
        } else {
            a = phi;
        }

        if F.abs() < TOLERANCE as f64 || b - a < TOLERANCE as f64 {
            break;
        }

        phi -= F / f;
        if !(phi > a && phi < b) {
            phi = 0.5 * (a + b);
        }
    }

    if flip {
        phi = TWO_PI as f64 - phi;
    }
    let pdf = (INV_TWO_PI as f64 * f / ak[0] as f64) as Float;
    (f as Float, pdf, phi as Float)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn weights_out_of_range() {
        let nodes = [0.0, 0.5, 1.0];
        assert!(catmull_rom_weights(&nodes, -0.1).is_none());
        assert!(catmull_rom_weights(&nodes, 1.1).is_none());
        assert!(catmull_rom_weights(&nodes, Float::NAN).is_none());
    }

    #[test]
    fn weights_first_segment_offset() {
        let nodes = [0.0, 0.5, 1.0, 1.5];
        let (w, offset) = catmull_rom_weights(&nodes, 0.25).unwrap();
        assert_eq!(offset, -1);
        assert_eq!(w[0], 0.0);

        let (_, offset) = catmull_rom_weights(&nodes, 1.25).unwrap();
        assert_eq!(offset, 1);
    }

    #[test]
    fn weights_at_node_select_it() {
        let nodes = [0.0, 0.5, 1.0, 1.5];
        let (w, offset) = catmull_rom_weights(&nodes, 0.5).unwrap();
        assert_eq!(offset, 0);
        assert!(approx_eq!(Float, w[1], 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, w[0] + w[2] + w[3], 0.0, epsilon = 1e-6));
    }

    #[test]
    fn integrate_constant() {
        let nodes = [0.0, 0.25, 0.5, 1.0];
        let (cdf, sum) = integrate_catmull_rom(&nodes, &[2.0; 4]);
        assert!(approx_eq!(Float, sum, 2.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, cdf[2], 1.0, epsilon = 1e-6));
        assert_eq!(cdf[0], 0.0);
    }

    #[test]
    fn integrate_linear() {
        let nodes = [0.0, 0.5, 1.0];
        let (_, sum) = integrate_catmull_rom(&nodes, &[0.0, 0.5, 1.0]);
        assert!(approx_eq!(Float, sum, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn fourier_series() {
        assert!(approx_eq!(Float, fourier(&[1.0, 0.5], 0.0), 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, fourier(&[1.0, 0.5], 1.0), 1.5, epsilon = 1e-6));
        // cos(2φ) = 2cos²φ - 1
        assert!(approx_eq!(Float, fourier(&[0.0, 0.0, 1.0], 0.5), -0.5, epsilon = 1e-6));
    }

    #[test]
    fn sample_constant_fourier_is_uniform() {
        let recip = [0.0, 1.0];
        let (y, pdf, phi) = sample_fourier(&[1.0], &recip, 0.25);
        assert_eq!(y, 1.0);
        assert!(approx_eq!(Float, pdf, INV_TWO_PI, epsilon = 1e-6));
        assert!(approx_eq!(Float, phi, PI_OVER_TWO, epsilon = 1e-4));
    }

    #[test]
    fn sample_2d_constant_is_uniform() {
        let nodes = [0.0, 0.5, 1.0];
        let values = [1.0; 9];
        let mut cdf = Vec::new();
        for row in values.chunks(3) {
            cdf.extend(integrate_catmull_rom(&nodes, row).0);
        }

        let (x, fval, pdf) = sample_catmull_rom_2d(&nodes, &nodes, &values, &cdf, 0.3, 0.4).unwrap();
        assert!(approx_eq!(Float, x, 0.4, epsilon = 1e-4));
        assert!(approx_eq!(Float, fval, 1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, pdf, 1.0, epsilon = 1e-5));

        assert!(sample_catmull_rom_2d(&nodes, &nodes, &values, &cdf, 2.0, 0.4).is_none());
    }

    proptest! {
        #[test]
        fn weights_partition_unity(x in 0.0..3.0f32) {
            let nodes = [0.0, 0.4, 1.0, 1.7, 3.0];
            let (w, _) = catmull_rom_weights(&nodes, x).unwrap();
            prop_assert!((w.iter().sum::<Float>() - 1.0).abs() < 1e-5);
        }

        #[test]
        fn fourier_samples_in_range(u in 0.0..1.0f32) {
            let recip = [0.0, 1.0, 0.5];
            let (_, pdf, phi) = sample_fourier(&[1.0, 0.4, 0.1], &recip, u);
            prop_assert!(pdf > 0.0);
            prop_assert!((0.0..=TWO_PI).contains(&phi));
        }
    }
}
