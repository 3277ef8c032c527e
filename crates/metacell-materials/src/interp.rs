//! Piecewise-linear interpolation of complex-valued tables.
//!
//! Tabulated refractive indices are given at discrete wavelengths. Between
//! knots the real and imaginary parts are interpolated linearly and
//! independently; outside the knot range the interpolator refuses to answer.

use num_complex::Complex64;

use crate::provider::MaterialError;

/// A linear interpolator over complex samples $(x_i, z_i)$.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    /// Strictly increasing knots.
    xs: Vec<f64>,
    /// Sample values at each knot.
    zs: Vec<Complex64>,
}

impl LinearInterpolator {
    /// Construct from knots and complex samples.
    ///
    /// # Errors
    /// Returns [`MaterialError::DataError`] if the lengths differ, fewer than
    /// two knots are given, or the knots are not strictly increasing.
    pub fn new(xs: Vec<f64>, zs: Vec<Complex64>) -> Result<Self, MaterialError> {
        if xs.len() != zs.len() {
            return Err(MaterialError::DataError(format!(
                "{} knots but {} samples",
                xs.len(),
                zs.len()
            )));
        }
        if xs.len() < 2 {
            return Err(MaterialError::DataError(
                "Need at least 2 data points".into(),
            ));
        }
        if let Some(i) = (1..xs.len()).find(|&i| !(xs[i] > xs[i - 1])) {
            return Err(MaterialError::DataError(format!(
                "Knots must be strictly increasing at index {}",
                i
            )));
        }
        Ok(Self { xs, zs })
    }

    /// First and last knot.
    pub fn range(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Knot positions.
    pub fn knots(&self) -> &[f64] {
        &self.xs
    }

    /// Sample values at the knots.
    pub fn samples(&self) -> &[Complex64] {
        &self.zs
    }

    /// Evaluate at `x`, returning `None` outside the knot range.
    ///
    /// At a knot the stored sample is returned exactly.
    pub fn evaluate(&self, x: f64) -> Option<Complex64> {
        let (min, max) = self.range();
        if !(x >= min && x <= max) {
            return None;
        }

        // Binary search for the enclosing interval
        let mut lo = 0;
        let mut hi = self.xs.len() - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        if x == self.xs[lo] {
            return Some(self.zs[lo]);
        }
        if x == self.xs[hi] {
            return Some(self.zs[hi]);
        }

        let t = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        let z_lo = self.zs[lo];
        let z_hi = self.zs[hi];
        Some(Complex64::new(
            z_lo.re + t * (z_hi.re - z_lo.re),
            z_lo.im + t * (z_hi.im - z_lo.im),
        ))
    }
}
