//! One-dimensional Gauss rules.

use crate::{Error, Rule};
use nalgebra::{DMatrix, SymmetricEigen};

/// Diagonal entry `k` of the Jacobi matrix associated with the Jacobi polynomials
/// $P^{(\alpha, \beta)}_k$.
fn recurrence_diagonal(k: usize, alpha: f64, beta: f64) -> f64 {
    let ab = alpha + beta;
    if k == 0 {
        (beta - alpha) / (ab + 2.0)
    } else {
        let t = 2.0 * k as f64 + ab;
        (beta * beta - alpha * alpha) / (t * (t + 2.0))
    }
}

/// Off-diagonal entry coupling rows `k - 1` and `k` of the Jacobi matrix, `k >= 1`.
fn recurrence_off_diagonal(k: usize, alpha: f64, beta: f64) -> f64 {
    let ab = alpha + beta;
    let k = k as f64;
    let t = 2.0 * k + ab;
    let numerator = 4.0 * k * (k + alpha) * (k + beta) * (k + ab);
    let denominator = t * t * (t + 1.0) * (t - 1.0);
    (numerator / denominator).sqrt()
}

fn factorial(n: u32) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Gauss–Jacobi quadrature for the weight $(1 - x)^\alpha (1 + x)^\beta$ on `[-1, 1]`.
///
/// The rule is computed with the Golub–Welsch algorithm: the points are the eigenvalues of the
/// symmetric tridiagonal Jacobi matrix, and the weights are given by the squared first
/// components of the normalized eigenvectors. With `n` points, polynomials of degree up to
/// `2 n - 1` (times the weight) are integrated exactly. Points are returned in ascending order.
///
/// Returns an error if zero points are requested.
pub fn gauss_jacobi(num_points: usize, alpha: u32, beta: u32) -> Result<Rule<1>, Error> {
    let n = num_points;
    if n == 0 {
        return Err(Error::NoRuleAvailable);
    }

    let (a, b) = (alpha as f64, beta as f64);
    let jacobi_matrix = DMatrix::from_fn(n, n, |r, c| {
        if r == c {
            recurrence_diagonal(r, a, b)
        } else if r + 1 == c || c + 1 == r {
            recurrence_off_diagonal(r.max(c), a, b)
        } else {
            0.0
        }
    });

    // Integral of the weight function over [-1, 1]
    let mu0 =
        2.0f64.powi((alpha + beta + 1) as i32) * factorial(alpha) * factorial(beta) / factorial(alpha + beta + 1);

    let eigen = SymmetricEigen::new(jacobi_matrix);
    let mut pairs: Vec<(f64, f64)> = (0..n)
        .map(|k| {
            let v0 = eigen.eigenvectors[(0, k)];
            (eigen.eigenvalues[k], mu0 * v0 * v0)
        })
        .collect();
    pairs.sort_by(|(x1, _), (x2, _)| x1.total_cmp(x2));

    let weights = pairs.iter().map(|&(_, w)| w).collect();
    let points = pairs.iter().map(|&(x, _)| [x]).collect();
    Ok((weights, points))
}

/// Gauss(–Legendre) quadrature for the reference interval `[-1, 1]`.
///
/// Given `n` points, the rule integrates polynomials of order up to `2 n - 1` exactly.
pub fn gauss(num_points: usize) -> Result<Rule<1>, Error> {
    gauss_jacobi(num_points, 0, 0)
}

/// Gauss quadrature for the unit interval `[0, 1]`.
pub fn unit_interval_gauss(num_points: usize) -> Result<Rule<1>, Error> {
    let (weights, points) = gauss(num_points)?;
    let weights = weights.into_iter().map(|w| 0.5 * w).collect();
    let points = points.into_iter().map(|[x]| [0.5 * (x + 1.0)]).collect();
    Ok((weights, points))
}
