//! Rules for the unit square and unit cube formed as tensor products of 1D Gauss rules.

use crate::univariate::unit_interval_gauss;
use crate::{Error, Rule};

/// A Gauss quadrature rule for the unit square `[0, 1]^2`.
///
/// The rule is constructed as a tensor product from 1D rules, with the provided number of
/// points per dimension.
pub fn unit_square_gauss(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = unit_interval_gauss(n)?;
    let mut weights2d = Vec::with_capacity(n * n);
    let mut points2d = Vec::with_capacity(n * n);

    let rule1d_iter = || weights1d.iter().zip(&points1d);

    for (&wx, &[x]) in rule1d_iter() {
        for (&wy, &[y]) in rule1d_iter() {
            weights2d.push(wx * wy);
            points2d.push([x, y]);
        }
    }

    Ok((weights2d, points2d))
}

/// A Gauss quadrature rule for the unit cube `[0, 1]^3`.
pub fn unit_cube_gauss(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    let n = num_points_per_dim;
    let (weights1d, points1d) = unit_interval_gauss(n)?;
    let mut weights3d = Vec::with_capacity(n * n * n);
    let mut points3d = Vec::with_capacity(n * n * n);

    let rule1d_iter = || weights1d.iter().zip(&points1d);

    for (&wx, &[x]) in rule1d_iter() {
        for (&wy, &[y]) in rule1d_iter() {
            for (&wz, &[z]) in rule1d_iter() {
                weights3d.push(wx * wy * wz);
                points3d.push([x, y, z]);
            }
        }
    }

    Ok((weights3d, points3d))
}
