use crate::element::{FiniteElement, ReferenceCell};
use crate::error::FormError;
use nalgebra::DMatrix;

/// A polynomial in up to three variables, stored as a sum of monomials.
#[derive(Debug, Clone, PartialEq)]
struct Polynomial {
    terms: Vec<(f64, [u32; 3])>,
}

impl Polynomial {
    fn evaluate_derivative(&self, derivatives: &[usize], xi: &[f64]) -> f64 {
        let mut sum = 0.0;
        'terms: for &(coefficient, exponents) in &self.terms {
            let mut exponents = exponents;
            let mut factor = coefficient;
            for &direction in derivatives {
                if exponents[direction] == 0 {
                    continue 'terms;
                }
                factor *= exponents[direction] as f64;
                exponents[direction] -= 1;
            }
            sum += xi
                .iter()
                .zip(&exponents)
                .fold(factor, |acc, (x, &e)| acc * x.powi(e as i32));
        }
        sum
    }
}

/// Exponents of the monomials spanning the polynomial space of the given cell and degree.
///
/// Simplices use the complete polynomials of total degree `degree`, tensor product cells use
/// polynomials of degree `degree` in each coordinate.
fn monomial_exponents(cell: ReferenceCell, degree: u32) -> Vec<[u32; 3]> {
    let dim = cell.dimension();
    let mut exponents = Vec::new();
    for a in 0..=degree {
        for b in 0..=degree {
            for c in 0..=degree {
                let alpha = [a, b, c];
                if alpha[dim..].iter().any(|&e| e != 0) {
                    continue;
                }
                if cell.is_simplex() && a + b + c > degree {
                    continue;
                }
                exponents.push(alpha);
            }
        }
    }
    exponents
}

/// Lagrange finite elements with equispaced nodes on a reference cell.
///
/// The vector-valued variant stacks one copy of the scalar basis per component: basis
/// function `k` is non-zero only in component `k / n`, where it equals scalar basis
/// function `k % n`.
#[derive(Debug, Clone)]
pub struct LagrangeElement {
    cell: ReferenceCell,
    degree: usize,
    value_shape: Vec<usize>,
    nodes: Vec<Vec<f64>>,
    basis: Vec<Polynomial>,
}

impl LagrangeElement {
    pub fn new(cell: ReferenceCell, degree: usize) -> Result<Self, FormError> {
        if cell == ReferenceCell::Vertex {
            return Err(FormError::Unhandled(format!(
                "Lagrange elements on a {} cell",
                cell.name()
            )));
        }

        let exponents = monomial_exponents(cell, degree as u32);
        let nodes: Vec<Vec<f64>> = if degree == 0 {
            vec![cell.midpoint()]
        } else {
            exponents
                .iter()
                .map(|alpha| {
                    alpha[..cell.dimension()]
                        .iter()
                        .map(|&a| a as f64 / degree as f64)
                        .collect()
                })
                .collect()
        };

        let n = exponents.len();
        let vandermonde = DMatrix::from_fn(n, n, |row, col| {
            nodes[row]
                .iter()
                .zip(&exponents[col])
                .map(|(x, &e)| x.powi(e as i32))
                .product::<f64>()
        });
        let coefficients = vandermonde.try_inverse().ok_or_else(|| {
            FormError::Unhandled(format!(
                "Lagrange element of degree {degree} on a {}: singular nodal basis",
                cell.name()
            ))
        })?;

        let basis = (0..n)
            .map(|i| Polynomial {
                terms: (0..n)
                    .map(|j| (coefficients[(j, i)], exponents[j]))
                    .filter(|(c, _)| *c != 0.0)
                    .collect(),
            })
            .collect();

        Ok(Self {
            cell,
            degree,
            value_shape: Vec::new(),
            nodes,
            basis,
        })
    }

    /// A vector-valued Lagrange element with `num_components` components.
    pub fn vector(cell: ReferenceCell, degree: usize, num_components: usize) -> Result<Self, FormError> {
        let mut element = Self::new(cell, degree)?;
        element.value_shape = vec![num_components];
        Ok(element)
    }

    /// The nodes of the scalar basis. Scalar basis function `i` is one at node `i` and zero at
    /// all other nodes.
    pub fn nodes(&self) -> &[Vec<f64>] {
        &self.nodes
    }

    pub fn num_scalar_basis_functions(&self) -> usize {
        self.basis.len()
    }
}

impl FiniteElement for LagrangeElement {
    fn signature(&self) -> String {
        match self.value_shape.first() {
            None => format!("Lagrange({}, {})", self.cell, self.degree),
            Some(components) => format!("VectorLagrange({}, {}, {})", self.cell, self.degree, components),
        }
    }

    fn cell(&self) -> ReferenceCell {
        self.cell
    }

    fn degree(&self) -> usize {
        self.degree
    }

    fn space_dimension(&self) -> usize {
        self.basis.len() * self.value_shape.iter().product::<usize>()
    }

    fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }

    fn evaluate(&self, basis: usize, component: &[usize], derivatives: &[usize], xi: &[f64]) -> f64 {
        let n = self.basis.len();
        if let Some(&c) = component.first() {
            if c != basis / n {
                return 0.0;
            }
        }
        self.basis[basis % n].evaluate_derivative(derivatives, xi)
    }
}
