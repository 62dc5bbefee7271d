//! Collapsed-coordinate rules for the unit triangle and the unit tetrahedron.
//!
//! The unit simplex is parametrized by the unit cube through the Duffy transformation
//!
//! ```text
//! x = u,  y = v (1 - u),  z = w (1 - u) (1 - v),
//! ```
//!
//! whose Jacobian determinant $(1 - u)^{d - 1} (1 - v)^{d - 2}$ is absorbed into Gauss–Jacobi
//! weights. A rule with `n` points per direction integrates polynomials of total degree
//! `2 n - 1` exactly.

use crate::univariate::gauss_jacobi;
use crate::{Error, Rule};

/// Maps a Gauss–Jacobi rule for the weight $(1 - t)^\alpha$ on `[-1, 1]` to the weight
/// $(1 - s)^\alpha$ on `[0, 1]`.
fn collapsed_direction(num_points: usize, alpha: u32) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let (weights, points) = gauss_jacobi(num_points, alpha, 0)?;
    let scale = 0.5f64.powi(alpha as i32 + 1);
    let weights = weights.into_iter().map(|w| scale * w).collect();
    let points = points.into_iter().map(|[t]| 0.5 * (t + 1.0)).collect();
    Ok((weights, points))
}

/// A collapsed Gauss rule for the unit triangle with vertices `(0, 0)`, `(1, 0)`, `(0, 1)`.
pub fn unit_triangle_collapsed_gauss(num_points_per_dim: usize) -> Result<Rule<2>, Error> {
    let (wu, pu) = collapsed_direction(num_points_per_dim, 1)?;
    let (wv, pv) = collapsed_direction(num_points_per_dim, 0)?;
    let u_rule: Vec<_> = wu.into_iter().zip(pu).collect();
    let v_rule: Vec<_> = wv.into_iter().zip(pv).collect();

    let mut weights = Vec::with_capacity(u_rule.len() * v_rule.len());
    let mut points = Vec::with_capacity(u_rule.len() * v_rule.len());
    for &(w_u, u) in &u_rule {
        for &(w_v, v) in &v_rule {
            weights.push(w_u * w_v);
            points.push([u, v * (1.0 - u)]);
        }
    }
    Ok((weights, points))
}

/// A collapsed Gauss rule for the unit tetrahedron spanned by the origin and the three
/// coordinate unit vectors.
pub fn unit_tetrahedron_collapsed_gauss(num_points_per_dim: usize) -> Result<Rule<3>, Error> {
    let (wu, pu) = collapsed_direction(num_points_per_dim, 2)?;
    let (wv, pv) = collapsed_direction(num_points_per_dim, 1)?;
    let (ww, pw) = collapsed_direction(num_points_per_dim, 0)?;
    let u_rule: Vec<_> = wu.into_iter().zip(pu).collect();
    let v_rule: Vec<_> = wv.into_iter().zip(pv).collect();
    let w_rule: Vec<_> = ww.into_iter().zip(pw).collect();

    let mut weights = Vec::new();
    let mut points = Vec::new();
    for &(w_u, u) in &u_rule {
        for &(w_v, v) in &v_rule {
            for &(w_w, w) in &w_rule {
                weights.push(w_u * w_v * w_w);
                points.push([u, v * (1.0 - u), w * (1.0 - u) * (1.0 - v)]);
            }
        }
    }
    Ok((weights, points))
}
