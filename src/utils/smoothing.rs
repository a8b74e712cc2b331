//! Cubic spline smoothing for the weekly commit curves.
//!
//! The spline interpolates every control point and uses not-a-knot end
//! conditions: the third derivative is continuous across the second and the
//! second-to-last knot. With exactly four points this is the single cubic
//! through all of them.

use crate::error::{ChartError, Result};

/// Number of points a smoothed curve is sampled at.
pub const SMOOTH_SAMPLES: usize = 500;

/// Fewest control points a cubic fit accepts.
pub const MIN_SPLINE_POINTS: usize = 4;

/// A fitted cubic interpolating spline.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivative at each knot
    moments: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `points`, which must have strictly increasing x.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < MIN_SPLINE_POINTS {
            return Err(ChartError::DataInsufficient(format!(
                "at least {MIN_SPLINE_POINTS} weeks of data are needed to draw a smooth curve, got {}",
                points.len()
            )));
        }
        if points.windows(2).any(|w| !(w[1].0 > w[0].0)) {
            return Err(ChartError::DataInsufficient(
                "curve points must have strictly increasing, distinct x values".to_string(),
            ));
        }

        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        let moments = solve_moments(&xs, &ys);

        Ok(Self { xs, ys, moments })
    }

    /// Value of the spline at `x`. Outside the knot range the end pieces are extended.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last = self.xs.len() - 2;
        let i = self
            .xs
            .partition_point(|&knot| knot <= x)
            .saturating_sub(1)
            .min(last);

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);
        let h = x1 - x0;
        let (left, right) = (x1 - x, x - x0);

        m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right
    }

    /// Sample the spline at `samples` evenly spaced x values from the first to the last knot.
    pub fn sample(&self, samples: usize) -> Vec<(f64, f64)> {
        let start = self.xs[0];
        let end = self.xs[self.xs.len() - 1];
        match samples {
            0 => Vec::new(),
            1 => vec![(start, self.evaluate(start))],
            _ => {
                let step = (end - start) / (samples - 1) as f64;
                (0..samples)
                    .map(|i| {
                        let x = if i == samples - 1 {
                            end
                        } else {
                            start + step * i as f64
                        };
                        (x, self.evaluate(x))
                    })
                    .collect()
            }
        }
    }
}

/// Fit a cubic spline through `points` and sample it at [`SMOOTH_SAMPLES`] positions.
pub fn smooth_curve(points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>> {
    Ok(CubicSpline::fit(points)?.sample(SMOOTH_SAMPLES))
}

/// Second derivatives at every knot.
///
/// The not-a-knot conditions express the two end moments through their
/// neighbours, which folds them into the first and last interior rows and
/// leaves a tridiagonal system over the interior knots.
fn solve_moments(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let m = n - 2;

    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];

    for k in 0..m {
        let i = k + 1;
        sub[k] = h[i - 1];
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        sup[k] = h[i];
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    // M0 = ((h0 + h1) M1 - h0 M2) / h1
    let (h0, h1) = (h[0], h[1]);
    diag[0] += h0 * (h0 + h1) / h1;
    sup[0] -= h0 * h0 / h1;
    sub[0] = 0.0;

    // M[n-1] = ((p + q) M[n-2] - q M[n-3]) / p
    let (p, q) = (h[n - 3], h[n - 2]);
    diag[m - 1] += q * (p + q) / p;
    sub[m - 1] -= q * q / p;
    sup[m - 1] = 0.0;

    // Thomas algorithm
    for k in 1..m {
        let w = sub[k] / diag[k - 1];
        diag[k] -= w * sup[k - 1];
        rhs[k] -= w * rhs[k - 1];
    }
    let mut interior = vec![0.0; m];
    interior[m - 1] = rhs[m - 1] / diag[m - 1];
    for k in (0..m - 1).rev() {
        interior[k] = (rhs[k] - sup[k] * interior[k + 1]) / diag[k];
    }

    let mut moments = Vec::with_capacity(n);
    moments.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
    moments.extend_from_slice(&interior);
    moments.push(((p + q) * interior[m - 1] - q * interior[m - 2]) / p);
    moments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn test_passes_through_control_points() {
        let points = vec![(0.0, 3.0), (1.0, 0.0), (2.0, 7.0), (3.0, 1.0), (4.0, 4.0), (5.0, 0.0)];
        let spline = CubicSpline::fit(&points).unwrap();
        for (x, y) in &points {
            assert_close(spline.evaluate(*x), *y);
        }
    }

    #[test]
    fn test_reproduces_cubic() {
        // Not-a-knot splines are exact for cubic polynomials
        let f = |x: f64| x * x * x - 2.0 * x * x + 0.5 * x + 1.0;
        let points: Vec<_> = (0..7).map(|i| (i as f64, f(i as f64))).collect();
        let spline = CubicSpline::fit(&points).unwrap();
        for i in 0..=60 {
            let x = i as f64 * 0.1;
            assert_close(spline.evaluate(x), f(x));
        }
    }

    #[test]
    fn test_four_points_fit_one_cubic() {
        let f = |x: f64| 2.0 * x * x * x - x + 3.0;
        let points: Vec<_> = (0..4).map(|i| (i as f64, f(i as f64))).collect();
        let spline = CubicSpline::fit(&points).unwrap();
        assert_close(spline.evaluate(1.5), f(1.5));
        assert_close(spline.evaluate(2.75), f(2.75));
    }

    #[test]
    fn test_uneven_spacing() {
        let f = |x: f64| x * x * x;
        let xs = [0.0, 0.5, 2.0, 2.5, 4.0];
        let points: Vec<_> = xs.iter().map(|&x| (x, f(x))).collect();
        let spline = CubicSpline::fit(&points).unwrap();
        assert_close(spline.evaluate(1.0), 1.0);
        assert_close(spline.evaluate(3.0), 27.0);
    }

    #[test]
    fn test_smooth_curve_samples() {
        let points = vec![(0.0, 1.0), (1.0, 0.0), (2.0, 4.0), (3.0, 2.0)];
        let curve = smooth_curve(&points).unwrap();
        assert_eq!(curve.len(), SMOOTH_SAMPLES);
        assert_eq!(curve[0].0, 0.0);
        assert_eq!(curve[SMOOTH_SAMPLES - 1].0, 3.0);
        assert_close(curve[0].1, 1.0);
        assert_close(curve[SMOOTH_SAMPLES - 1].1, 2.0);
        assert!(curve.windows(2).all(|w| w[1].0 > w[0].0));
    }

    #[test]
    fn test_deterministic() {
        let points = vec![(0.0, 5.0), (1.0, 2.0), (2.0, 0.0), (3.0, 9.0), (4.0, 1.0)];
        assert_eq!(smooth_curve(&points).unwrap(), smooth_curve(&points).unwrap());
    }

    #[test]
    fn test_too_few_points() {
        for n in 0..MIN_SPLINE_POINTS {
            let points: Vec<_> = (0..n).map(|i| (i as f64, 1.0)).collect();
            let err = smooth_curve(&points).unwrap_err();
            assert!(matches!(err, ChartError::DataInsufficient(_)));
        }
    }

    #[test]
    fn test_rejects_repeated_x() {
        let points = vec![(0.0, 1.0), (1.0, 2.0), (1.0, 3.0), (2.0, 4.0)];
        assert!(matches!(
            CubicSpline::fit(&points),
            Err(ChartError::DataInsufficient(_))
        ));
    }
}
