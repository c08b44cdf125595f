//! Shape-preserving piecewise cubic Hermite interpolation (PCHIP).
//!
//! Given knots `x_0 < x_1 < ... < x_{n-1}` with values `y_k`, each segment is a
//! cubic Hermite polynomial matching the values and the slopes `d_k` at both
//! ends. Slopes are chosen so the interpolant never overshoots where the data
//! is monotone (Fritsch–Butland weighting, as in SciPy's `PchipInterpolator`):
//!
//! - secants: `h_k = x_{k+1} - x_k`, `m_k = (y_{k+1} - y_k) / h_k`
//! - interior: `d_k = 0` if `m_{k-1}` and `m_k` differ in sign or either is
//!   zero, otherwise the weighted harmonic mean
//!   `(w1 + w2) / d_k = w1 / m_{k-1} + w2 / m_k` with
//!   `w1 = 2 h_k + h_{k-1}`, `w2 = h_k + 2 h_{k-1}`
//! - ends: one-sided three-point estimate, zeroed if its sign disagrees with
//!   the first secant and capped at `3 m` if the secants change sign
//!
//! With only two knots both slopes equal the single secant and the
//! interpolant is exactly the straight line.

/// A one-dimensional curve that can be sampled anywhere on the real line.
pub trait Curve {
    fn value(&self, x: f64) -> f64;
}

/// Fitted PCHIP interpolant.
///
/// Outside `[x_0, x_{n-1}]` the end segments' cubics are continued; callers
/// decide whether that is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct Pchip {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    /// Fit the interpolant.
    ///
    /// Returns `None` if fewer than two knots are given, the lengths differ,
    /// any value is non-finite, or `xs` is not strictly increasing.
    pub fn new(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 2 || ys.len() != n {
            return None;
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return None;
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }

        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = ys
            .windows(2)
            .zip(h.iter())
            .map(|(w, &hk)| (w[1] - w[0]) / hk)
            .collect();

        let slopes = if n == 2 {
            vec![m[0], m[0]]
        } else {
            let mut d = vec![0.0; n];
            for k in 1..n - 1 {
                let (m0, m1) = (m[k - 1], m[k]);
                if sign(m0) != sign(m1) || m0 == 0.0 || m1 == 0.0 {
                    continue;
                }
                let w1 = 2.0 * h[k] + h[k - 1];
                let w2 = h[k] + 2.0 * h[k - 1];
                d[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
            }
            d[0] = edge_slope(h[0], h[1], m[0], m[1]);
            d[n - 1] = edge_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);
            d
        };

        Some(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
        })
    }

    /// Index of the segment used to evaluate `x`.
    fn segment(&self, x: f64) -> usize {
        let last = self.xs.len() - 2;
        // First knot strictly greater than x, minus one.
        let idx = self.xs.partition_point(|&k| k <= x);
        idx.saturating_sub(1).min(last)
    }
}

impl Curve for Pchip {
    fn value(&self, x: f64) -> f64 {
        let k = self.segment(x);
        let h = self.xs[k + 1] - self.xs[k];
        let t = (x - self.xs[k]) / h;
        let t2 = t * t;
        let omt = 1.0 - t;
        let omt2 = omt * omt;

        let h00 = (1.0 + 2.0 * t) * omt2;
        let h10 = t * omt2;
        let h01 = t2 * (3.0 - 2.0 * t);
        let h11 = t2 * (t - 1.0);

        h00 * self.ys[k] + h10 * h * self.slopes[k] + h01 * self.ys[k + 1] + h11 * h * self.slopes[k + 1]
    }
}

/// Sign as -1, 0 or 1 (zero stays zero, unlike `f64::signum`).
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// One-sided three-point end slope with shape-preserving corrections.
fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}
