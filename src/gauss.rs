//! Gaussian weight table used to reconstruct each output pixel from a small
//! grid of supersamples.

/// Width constant from the squared-exponent term: `exp(-x^2 * W^2 / 2)`.
const WIDTH: f32 = 2.2;

/// An unnormalized, odd-length table of discrete normal-distribution
/// weights, plus the lookup parameters needed to interpolate it at an
/// arbitrary continuous position (used by the jitter sampling path).
#[derive(Debug, Clone)]
pub struct GaussTable {
    weights: Vec<f32>,
    mid: f32,
}

impl GaussTable {
    /// `n` must be odd. Entry `i` is `exp(-((mid-i)/mid)^2 * W^2/2)` with
    /// `mid = n/2 - 0.5`. The table is not normalized; callers divide the
    /// accumulated weight by its sum.
    pub fn build(n: usize) -> GaussTable {
        debug_assert!(n % 2 == 1, "gauss table size must be odd");
        let factor = WIDTH * WIDTH * 0.5;
        let mid = n as f32 / 2.0 - 0.5;

        let weights = (0..n)
            .map(|i| {
                let t = (mid - i as f32) / mid;
                (-(t * t) * factor).exp()
            })
            .collect();

        GaussTable { weights, mid }
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Maps a continuous position (measured in the same units as
    /// `half_width`, centered on `mid`) into the table and linearly
    /// interpolates between the two bracketing entries. Returns 0 outside
    /// the table's support.
    pub fn lookup(&self, value: f32, mid: f32, half_width: f32) -> f32 {
        let scale = self.mid / half_width;
        let pos = self.mid + (value - mid) * scale;

        if pos < 0.0 || pos > (self.weights.len() - 1) as f32 {
            return 0.0;
        }

        let lo = pos.floor();
        let frac = pos - lo;
        let lo_idx = lo as usize;
        let hi_idx = (lo_idx + 1).min(self.weights.len() - 1);

        self.weights[lo_idx] * (1.0 - frac) + self.weights[hi_idx] * frac
    }

    pub fn lookup_2d(&self, x: f32, xmid: f32, y: f32, ymid: f32, half_width: f32) -> f32 {
        self.lookup(x, xmid, half_width) * self.lookup(y, ymid, half_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_is_positive() {
        for &n in &[3, 5, 11] {
            let table = GaussTable::build(n);
            assert!(table.sum() > 0.0);
        }
    }

    #[test]
    fn symmetric_about_middle() {
        for &n in &[3, 11, 21] {
            let table = GaussTable::build(n);
            let w = table.weights();
            for i in 0..n {
                assert!((w[i] - w[n - 1 - i]).abs() < 1e-6, "n={n} i={i}");
            }
        }
    }

    #[test]
    fn peak_at_center() {
        let table = GaussTable::build(11);
        let w = table.weights();
        let peak = w.iter().cloned().fold(f32::MIN, f32::max);
        assert!((w[5] - peak).abs() < 1e-6);
    }

    #[test]
    fn lookup_interpolates_distinct_neighbors() {
        // The known bug in the original jitter path samples the low index
        // twice; a correct lookup must use both bracketing entries, so the
        // value strictly between two unequal table entries must differ
        // from either endpoint.
        let table = GaussTable::build(11);
        let half_width = 1.2 * 0.5;
        let lo = table.lookup(-half_width * 0.4, 0.0, half_width);
        let mid = table.lookup(-half_width * 0.2, 0.0, half_width);
        let hi = table.lookup(0.0, 0.0, half_width);
        assert!(lo < mid && mid < hi, "expected strictly increasing toward the peak");
    }

    #[test]
    fn lookup_out_of_range_is_zero() {
        let table = GaussTable::build(11);
        assert_eq!(table.lookup(100.0, 0.0, 0.6), 0.0);
        assert_eq!(table.lookup(-100.0, 0.0, 0.6), 0.0);
    }
}
