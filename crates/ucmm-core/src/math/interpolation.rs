//! Interpolation functions for LUT evaluation
//!
//! This module provides:
//! - Linear interpolation (1D)
//! - Uniform table lookup
//! - N-linear interpolation over an ICC CLUT grid

/// Linear interpolation between two values
///
/// Returns a + t * (b - a) for t in [0, 1]
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Sample a uniformly spaced table over `[0, 1]` with linear interpolation.
///
/// `sample(i)` returns the already normalized value of entry `i`. Input is
/// clamped, so indices never leave `0..len`.
pub fn table_lookup(len: usize, x: f64, sample: impl Fn(usize) -> f64) -> f64 {
    match len {
        0 => x,
        1 => sample(0),
        _ => {
            let last = len - 1;
            let pos = x.clamp(0.0, 1.0) * last as f64;
            let lo = (pos.floor() as usize).min(last - 1);
            lerp(sample(lo), sample(lo + 1), pos - lo as f64)
        }
    }
}

/// N-linear interpolation in a CLUT.
///
/// The grid is laid out with the first input dimension varying slowest and
/// `outputs` interleaved values per node, as in every ICC CLUT. Inputs are
/// clamped to `[0, 1]`; missing inputs read as zero.
pub fn multilinear(
    grid: &[usize],
    outputs: usize,
    input: &[f64],
    sample: impl Fn(usize) -> f64,
) -> Vec<f64> {
    let dims = grid.len();
    let mut base = vec![0usize; dims];
    let mut frac = vec![0.0f64; dims];
    let mut step = vec![0usize; dims];

    let mut stride = outputs;
    for d in (0..dims).rev() {
        let max = grid[d].saturating_sub(1);
        let pos = input.get(d).copied().unwrap_or(0.0).clamp(0.0, 1.0) * max as f64;
        let lo = (pos.floor() as usize).min(max.saturating_sub(1));
        base[d] = lo * stride;
        frac[d] = if max == 0 { 0.0 } else { pos - lo as f64 };
        step[d] = if max == 0 { 0 } else { stride };
        stride *= grid[d].max(1);
    }

    let mut out = vec![0.0f64; outputs];
    for corner in 0..(1usize << dims) {
        let mut weight = 1.0;
        let mut offset = 0;
        for d in 0..dims {
            if corner & (1 << d) != 0 {
                weight *= frac[d];
                offset += base[d] + step[d];
            } else {
                weight *= 1.0 - frac[d];
                offset += base[d];
            }
        }
        if weight == 0.0 {
            continue;
        }
        for (o, value) in out.iter_mut().enumerate() {
            *value += weight * sample(offset + o);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_table_lookup() {
        let table = [0.0, 0.5, 1.0];
        assert_eq!(table_lookup(3, 0.25, |i| table[i]), 0.25);
        assert_eq!(table_lookup(3, 1.0, |i| table[i]), 1.0);
        assert_eq!(table_lookup(3, 7.0, |i| table[i]), 1.0);
        assert_eq!(table_lookup(0, 0.3, |_| 9.0), 0.3);
    }

    /// Identity 3D CLUT: each node stores its own coordinates.
    fn identity_clut(n: usize) -> Vec<f64> {
        let mut data = Vec::new();
        for r in 0..n {
            for g in 0..n {
                for b in 0..n {
                    let s = (n - 1) as f64;
                    data.extend([r as f64 / s, g as f64 / s, b as f64 / s]);
                }
            }
        }
        data
    }

    #[test]
    fn test_multilinear_identity() {
        let clut = identity_clut(5);
        for input in [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [0.3, 0.6, 0.9], [0.1, 0.5, 0.25]] {
            let out = multilinear(&[5, 5, 5], 3, &input, |i| clut[i]);
            for c in 0..3 {
                assert!((out[c] - input[c]).abs() < 1e-12, "{input:?} -> {out:?}");
            }
        }
    }

    #[test]
    fn test_multilinear_slowest_first_dimension() {
        // 2x3 grid, one output: value = 10 * first + second
        let grid = [2, 3];
        let data = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let out = multilinear(&grid, 1, &[1.0, 0.5], |i| data[i]);
        assert!((out[0] - 11.0).abs() < 1e-12);
        let out = multilinear(&grid, 1, &[0.5, 1.0], |i| data[i]);
        assert!((out[0] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_multilinear_single_point_dimension() {
        let data = [0.25, 0.75];
        let out = multilinear(&[1, 2], 1, &[0.9, 0.5], |i| data[i]);
        assert!((out[0] - 0.5).abs() < 1e-12);
    }
}
