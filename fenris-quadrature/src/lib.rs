//! Quadrature rules for unit reference domains.
//!
//! All rules in this crate are defined on the *unit* reference domains used by the form
//! compiler: the interval `[0, 1]`, the unit square and cube, and the unit simplices
//! spanned by the origin and the coordinate unit vectors. The only exception is
//! [`univariate::gauss`] and [`univariate::gauss_jacobi`], which live on `[-1, 1]` since that is
//! where the classical orthogonal polynomials are defined.

use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod tensor;
pub mod univariate;

/// Library-wide error type.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A D-dimensional point.
pub type Point<const D: usize> = [f64; D];

/// A D-dimensional rule.
pub type Rule<const D: usize> = (Vec<f64>, Vec<Point<D>>);

/// Approximates the integral of `f` with the given rule.
///
/// Contributions are accumulated in point order, so the result is reproducible bit for bit.
pub fn integrate<const D: usize>(rule: &Rule<D>, f: impl Fn(&Point<D>) -> f64) -> f64 {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .fold(0.0, |sum, (w, x)| sum + w * f(x))
}

/// Number of Gauss points per direction needed to integrate polynomials of the given
/// degree exactly.
pub fn points_for_degree(degree: usize) -> usize {
    degree / 2 + 1
}
