use crate::error::FormError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Reference cells of the form compiler.
///
/// Simplices are the unit simplices with vertex `0` at the origin and vertex `k` at the
/// `k`-th unit vector. Quadrilaterals and hexahedra are the unit square and cube with
/// vertices numbered lexicographically with the first coordinate varying fastest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReferenceCell {
    /// A single point. Only appears as the facet of an interval.
    Vertex,
    Interval,
    Triangle,
    Tetrahedron,
    Quadrilateral,
    Hexahedron,
}

// Facet `f` of a simplex is the facet opposite vertex `f`. Vertices of a facet are listed
// so that `v0 + sum_k xi_k (v_{k+1} - v0)`, summing over the facet dimension, maps the facet
// reference cell onto the facet.
const INTERVAL_FACETS: [&[usize]; 2] = [&[1], &[0]];
const TRIANGLE_FACETS: [&[usize]; 3] = [&[1, 2], &[0, 2], &[0, 1]];
const TETRAHEDRON_FACETS: [&[usize]; 4] = [&[1, 2, 3], &[0, 2, 3], &[0, 1, 3], &[0, 1, 2]];
const QUADRILATERAL_FACETS: [&[usize]; 4] = [&[0, 1], &[0, 2], &[1, 3], &[2, 3]];
const HEXAHEDRON_FACETS: [&[usize]; 6] = [
    &[0, 1, 2, 3],
    &[0, 1, 4, 5],
    &[0, 2, 4, 6],
    &[1, 3, 5, 7],
    &[2, 3, 6, 7],
    &[4, 5, 6, 7],
];

impl ReferenceCell {
    pub fn dimension(&self) -> usize {
        match self {
            Self::Vertex => 0,
            Self::Interval => 1,
            Self::Triangle | Self::Quadrilateral => 2,
            Self::Tetrahedron | Self::Hexahedron => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Interval => "interval",
            Self::Triangle => "triangle",
            Self::Tetrahedron => "tetrahedron",
            Self::Quadrilateral => "quadrilateral",
            Self::Hexahedron => "hexahedron",
        }
    }

    pub fn is_simplex(&self) -> bool {
        matches!(self, Self::Vertex | Self::Interval | Self::Triangle | Self::Tetrahedron)
    }

    pub fn vertices(&self) -> Vec<Vec<f64>> {
        match self {
            Self::Vertex => vec![vec![]],
            Self::Interval => vec![vec![0.0], vec![1.0]],
            Self::Triangle => vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            Self::Tetrahedron => vec![
                vec![0.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
            Self::Quadrilateral => vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]],
            Self::Hexahedron => (0..8)
                .map(|v| (0..3).map(|d| ((v >> d) & 1) as f64).collect())
                .collect(),
        }
    }

    /// The centroid of the cell.
    pub fn midpoint(&self) -> Vec<f64> {
        let vertices = self.vertices();
        let n = vertices.len() as f64;
        (0..self.dimension())
            .map(|d| vertices.iter().map(|v| v[d]).sum::<f64>() / n)
            .collect()
    }

    pub fn num_facets(&self) -> usize {
        self.facets().len()
    }

    fn facets(&self) -> &'static [&'static [usize]] {
        match self {
            Self::Vertex => &[],
            Self::Interval => &INTERVAL_FACETS,
            Self::Triangle => &TRIANGLE_FACETS,
            Self::Tetrahedron => &TETRAHEDRON_FACETS,
            Self::Quadrilateral => &QUADRILATERAL_FACETS,
            Self::Hexahedron => &HEXAHEDRON_FACETS,
        }
    }

    /// The vertices of the given facet, or `None` if the facet does not exist.
    pub fn facet_vertices(&self, facet: usize) -> Option<&'static [usize]> {
        self.facets().get(facet).copied()
    }

    /// The reference cell of the facets of this cell.
    pub fn facet_cell(&self) -> Option<ReferenceCell> {
        match self {
            Self::Vertex => None,
            Self::Interval => Some(Self::Vertex),
            Self::Triangle | Self::Quadrilateral => Some(Self::Interval),
            Self::Tetrahedron => Some(Self::Triangle),
            Self::Hexahedron => Some(Self::Quadrilateral),
        }
    }

    /// Returns the affine map `xi -> origin + matrix * xi` from facet reference coordinates to
    /// the coordinates of this cell.
    pub fn facet_map(&self, facet: usize) -> Result<(DVector<f64>, DMatrix<f64>), FormError> {
        let facet_vertices = self.facet_vertices(facet).ok_or_else(|| {
            FormError::Unhandled(format!(
                "facet {facet} of a {} (which has {} facets)",
                self.name(),
                self.num_facets()
            ))
        })?;
        let vertices = self.vertices();
        let origin = DVector::from_column_slice(&vertices[facet_vertices[0]]);
        let facet_dim = self.dimension() - 1;
        let matrix = DMatrix::from_fn(self.dimension(), facet_dim, |d, k| {
            vertices[facet_vertices[k + 1]][d] - origin[d]
        });
        Ok((origin, matrix))
    }
}

impl Display for ReferenceCell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
