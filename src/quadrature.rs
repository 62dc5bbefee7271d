//! Quadrature rules on reference cells and their facets.
use crate::element::ReferenceCell;
use crate::error::FormError;
use fenris_quadrature::simplex::{unit_tetrahedron_collapsed_gauss, unit_triangle_collapsed_gauss};
use fenris_quadrature::tensor::{unit_cube_gauss, unit_square_gauss};
use fenris_quadrature::univariate::unit_interval_gauss;
use fenris_quadrature::{points_for_degree, Rule};
use nalgebra::DVector;

pub use fenris_quadrature::Error as QuadratureError;

/// A quadrature rule with points given in the coordinates of a reference cell.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    weights: Vec<f64>,
    points: Vec<DVector<f64>>,
}

impl<const D: usize> From<Rule<D>> for QuadratureRule {
    fn from((weights, points): Rule<D>) -> Self {
        let points = points
            .iter()
            .map(|p| DVector::from_column_slice(p))
            .collect();
        Self { weights, points }
    }
}

impl QuadratureRule {
    /// A rule on the cell that integrates polynomials of the given degree exactly.
    pub fn for_cell(cell: ReferenceCell, degree: usize) -> Result<Self, FormError> {
        let n = points_for_degree(degree);
        let rule = match cell {
            ReferenceCell::Vertex => Self {
                weights: vec![1.0],
                points: vec![DVector::zeros(0)],
            },
            ReferenceCell::Interval => unit_interval_gauss(n)?.into(),
            ReferenceCell::Triangle => unit_triangle_collapsed_gauss(n)?.into(),
            ReferenceCell::Tetrahedron => unit_tetrahedron_collapsed_gauss(n)?.into(),
            ReferenceCell::Quadrilateral => unit_square_gauss(n)?.into(),
            ReferenceCell::Hexahedron => unit_cube_gauss(n)?.into(),
        };
        Ok(rule)
    }

    /// A rule on a facet of the cell, with points given in the coordinates of the cell.
    ///
    /// Weights refer to the reference cell of the facet.
    pub fn for_facet(cell: ReferenceCell, facet: usize, degree: usize) -> Result<Self, FormError> {
        let facet_cell = cell
            .facet_cell()
            .ok_or_else(|| FormError::Unhandled(format!("facet integrals on a {cell} cell")))?;
        let (origin, map) = cell.facet_map(facet)?;
        let facet_rule = Self::for_cell(facet_cell, degree)?;
        let points = facet_rule
            .points
            .iter()
            .map(|xi| &origin + &map * xi)
            .collect();
        Ok(Self {
            weights: facet_rule.weights,
            points,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn points(&self) -> &[DVector<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
