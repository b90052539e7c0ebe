//! Discrete Fourier transforms over `Complex64`.
//!
//! Bins follow the usual ordering: index 0 is DC, indices up to `n/2` are
//! positive frequencies and the upper half wraps around to negative ones.
//! The inverse is scaled by `1/n`, so `inverse(forward(x)) == x`.

use std::f64::consts::PI;

use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => -1.0,
            Direction::Inverse => 1.0,
        }
    }
}

/// Forward DFT of a real series.
pub fn forward_real(series: &[f64]) -> Vec<Complex64> {
    let mut bins: Vec<Complex64> = series.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    forward(&mut bins);
    bins
}

/// In-place forward DFT.
pub fn forward(bins: &mut [Complex64]) {
    transform(bins, Direction::Forward);
}

/// In-place inverse DFT, scaled by `1/n`.
pub fn inverse(bins: &mut [Complex64]) {
    transform(bins, Direction::Inverse);
    let scale = 1.0 / bins.len() as f64;
    for bin in bins.iter_mut() {
        *bin *= scale;
    }
}

fn transform(bins: &mut [Complex64], direction: Direction) {
    let n = bins.len();
    if n <= 1 {
        return;
    }
    if n.is_power_of_two() {
        radix2(bins, direction);
    } else {
        let out = direct(bins, direction);
        bins.copy_from_slice(&out);
    }
}

/// Iterative Cooley-Tukey; `bins.len()` must be a power of two.
fn radix2(bins: &mut [Complex64], direction: Direction) {
    let n = bins.len();
    let bits = n.trailing_zeros();

    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if j > i {
            bins.swap(i, j);
        }
    }

    let mut len = 2;
    while len <= n {
        let angle = direction.sign() * 2.0 * PI / len as f64;
        let half = len / 2;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                // twiddle from the exact angle, not a running product
                let w = Complex64::from_polar(1.0, angle * k as f64);
                let even = bins[start + k];
                let odd = bins[start + k + half] * w;
                bins[start + k] = even + odd;
                bins[start + k + half] = even - odd;
            }
        }
        len <<= 1;
    }
}

/// O(n²) transform for lengths that are not a power of two.
fn direct(bins: &[Complex64], direction: Direction) -> Vec<Complex64> {
    let n = bins.len();
    let base = direction.sign() * 2.0 * PI / n as f64;
    (0..n)
        .map(|k| {
            bins.iter()
                .enumerate()
                .map(|(t, &x)| {
                    // reduce k*t mod n before converting to an angle
                    let idx = (k * t) % n;
                    x * Complex64::from_polar(1.0, base * idx as f64)
                })
                .sum::<Complex64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.iter().zip(b).enumerate() {
            assert!((x - y).norm() < tol, "bin {}: {} vs {}", i, x, y);
        }
    }

    fn sample(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| Complex64::new((i as f64 * 0.37).sin() + 0.1 * i as f64, (i as f64).cos()))
            .collect()
    }

    #[test]
    fn test_radix2_agrees_with_direct() {
        for n in [2, 4, 8, 64, 256] {
            let input = sample(n);
            let mut fast = input.clone();
            radix2(&mut fast, Direction::Forward);
            let slow = direct(&input, Direction::Forward);
            assert_close(&fast, &slow, 1e-9);
        }
    }

    #[test]
    fn test_round_trip_recovers_input() {
        for n in [1, 3, 8, 100, 128, 200] {
            let input = sample(n);
            let mut bins = input.clone();
            forward(&mut bins);
            inverse(&mut bins);
            assert_close(&bins, &input, 1e-9);
        }
    }

    #[test]
    fn test_known_spectrum() {
        // [0,1,0,-1] -> [0, -2i, 0, 2i]
        let bins = forward_real(&[0.0, 1.0, 0.0, -1.0]);
        let expected = [
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -2.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 2.0),
        ];
        assert_close(&bins, &expected, 1e-12);
    }

    #[test]
    fn test_dc_bin_is_sum() {
        let series = [1.5, -2.0, 4.0, 0.25, 3.0];
        let bins = forward_real(&series);
        assert!((bins[0].re - series.iter().sum::<f64>()).abs() < 1e-12);
        assert!(bins[0].im.abs() < 1e-12);
    }

    #[test]
    fn test_empty_is_noop() {
        let mut bins: Vec<Complex64> = Vec::new();
        forward(&mut bins);
        assert!(bins.is_empty());
    }
}
