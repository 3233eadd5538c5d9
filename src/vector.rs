use std::fmt;
use std::ops::Mul;

use ndarray::Array1;

use crate::error::{KMeansError, Result};

/// A point (or centroid) in d-dimensional real space.
///
/// The component count is fixed at construction. Arithmetic between two
/// vectors requires equal component counts; the checked operations return
/// `DimensionMismatch` otherwise. A `Vector` is a pure value: cluster
/// membership is tracked by the clusterer, not on the vector itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    components: Array1<f64>,
}

impl Vector {
    pub fn new(components: Vec<f64>) -> Self {
        Self {
            components: Array1::from(components),
        }
    }

    /// All-zero vector, the accumulator seed for a centroid mean.
    pub fn zeros(dim: usize) -> Self {
        Self {
            components: Array1::zeros(dim),
        }
    }

    pub fn dim(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &Array1<f64> {
        &self.components
    }

    fn check_dims(&self, other: &Self, op: &'static str) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(KMeansError::DimensionMismatch {
                op,
                left: self.dim(),
                right: other.dim(),
            });
        }
        Ok(())
    }

    /// Component-wise sum.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_dims(other, "add")?;
        Ok(Self {
            components: &self.components + &other.components,
        })
    }

    /// Component-wise difference.
    pub fn subtract(&self, other: &Self) -> Result<Self> {
        self.check_dims(other, "subtract")?;
        Ok(Self {
            components: &self.components - &other.components,
        })
    }

    /// Multiply every component by a scalar. Also available as `&v * s`
    /// and `s * &v`.
    pub fn scale(&self, scalar: f64) -> Self {
        Self {
            components: &self.components * scalar,
        }
    }

    /// Raise every component to the given exponent.
    pub fn powf(&self, exponent: f64) -> Self {
        Self {
            components: self.components.mapv(|c| c.powf(exponent)),
        }
    }

    /// Sum of all components.
    pub fn sum(&self) -> f64 {
        self.components.sum()
    }

    /// `sqrt(sum((a - b)^2))`.
    pub fn euclidean_distance(&self, other: &Self) -> Result<f64> {
        self.check_dims(other, "euclidean_distance")?;
        let diff = self.subtract(other)?;
        Ok(diff.powf(2.0).sum().sqrt())
    }

    /// Round every component to `decimals` decimal places.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            components: self.components.mapv(|c| (c * factor).round() / factor),
        }
    }

    /// True when every component delta is within `tol`. Vectors of
    /// different dimension never compare close.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.dim() == other.dim()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, scalar: f64) -> Vector {
        self.scale(scalar)
    }
}

impl Mul<&Vector> for f64 {
    type Output = Vector;

    fn mul(self, vector: &Vector) -> Vector {
        vector.scale(self)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{:.4}", c)?;
        }
        Ok(())
    }
}
