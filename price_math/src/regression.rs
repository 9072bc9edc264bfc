//! Ordinary least-squares line fitting
//!
//! Fits `y = intercept + slope * x` over arbitrary `(x, y)` pairs. Unlike a
//! rolling regression, the x values are supplied by the caller, so gaps and
//! repeated x values (several observations on the same day) are handled
//! naturally.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// x-variance below this is treated as zero
const DEGENERATE_EPSILON: f64 = 1e-10;

/// A fitted straight line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Change in y per unit of x
    pub slope: f64,
    /// Value of y at x = 0
    pub intercept: f64,
}

impl LinearFit {
    /// Fit a line to the given points by ordinary least squares.
    ///
    /// When every point shares the same x value the slope is undetermined;
    /// the minimum-norm solution is returned instead of an error: a flat
    /// line through the mean of y.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(MathError::InsufficientData(
                "Need at least 1 point to fit a line".to_string(),
            ));
        }

        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(MathError::InvalidInput(
                "Points must be finite".to_string(),
            ));
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for &(x, y) in points {
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < DEGENERATE_EPSILON {
            return Ok(Self {
                slope: 0.0,
                intercept: y_mean,
            });
        }

        let slope = numerator / denominator;
        let intercept = y_mean - slope * x_mean;

        Ok(Self { slope, intercept })
    }

    /// Predict y at the given x
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Coefficient of determination of this line over `points`
    pub fn r_squared(&self, points: &[(f64, f64)]) -> Result<f64> {
        if points.is_empty() {
            return Err(MathError::InsufficientData(
                "Not enough data to calculate R-squared".to_string(),
            ));
        }

        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;

        for &(x, y) in points {
            ss_total += (y - y_mean).powi(2);
            ss_residual += (y - self.predict(x)).powi(2);
        }

        if ss_total.abs() < DEGENERATE_EPSILON {
            // A constant series is explained perfectly only by a flat line through it
            return if ss_residual.abs() < DEGENERATE_EPSILON {
                Ok(1.0)
            } else {
                Err(MathError::CalculationError(
                    "Cannot calculate R-squared: total sum of squares is zero".to_string(),
                ))
            };
        }

        Ok(1.0 - ss_residual / ss_total)
    }
}
