//! Numerical integration of products of basis functions over reference cells and facets.
use crate::element::{Element, ReferenceCell};
use crate::error::FormError;
use crate::form::{BasisFunction, Restriction};
use crate::index::{Index, IndexKind};
use crate::quadrature::QuadratureRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Evaluates the integral of a product of basis functions for fixed index values.
pub trait QuadratureEvaluator: Sync {
    /// Integrates the product of all basis functions, with primary indices taking the values
    /// `i`, secondary indices the values `a` and auxiliary indices the values `b`.
    fn integrate(
        &self,
        basis_functions: &[BasisFunction],
        i: &[usize],
        a: &[usize],
        b: &[usize],
    ) -> Result<f64, FormError>;
}

/// The part of the reference cell that is integrated over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QuadratureDomain {
    Cell,
    ExteriorFacet(usize),
    /// The facets of the plus and minus side, in the numbering of their own cells.
    InteriorFacet(usize, usize),
}

impl Display for QuadratureDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell => write!(f, "cell"),
            Self::ExteriorFacet(facet) => write!(f, "exterior facet {facet}"),
            Self::InteriorFacet(plus, minus) => write!(f, "interior facet ({plus}, {minus})"),
        }
    }
}

/// The quadrature degree that integrates a product of the given basis functions exactly.
pub fn default_quadrature_degree(basis_functions: &[BasisFunction]) -> usize {
    basis_functions.iter().map(|v| v.element.degree()).sum()
}

/// Integrates products of basis functions with quadrature on a reference cell.
///
/// On interior facets, minus-restricted basis functions are evaluated at the quadrature
/// points of the minus facet and all other basis functions at those of the plus facet. The
/// points of both sides correspond to the same points of the reference facet.
#[derive(Debug, Clone)]
pub struct ReferenceIntegrator {
    cell: ReferenceCell,
    domain: QuadratureDomain,
    plus: QuadratureRule,
    minus: QuadratureRule,
}

impl ReferenceIntegrator {
    pub fn new(cell: ReferenceCell, domain: QuadratureDomain, degree: usize) -> Result<Self, FormError> {
        let (plus, minus) = match domain {
            QuadratureDomain::Cell => {
                let rule = QuadratureRule::for_cell(cell, degree)?;
                (rule.clone(), rule)
            }
            QuadratureDomain::ExteriorFacet(facet) => {
                let rule = QuadratureRule::for_facet(cell, facet, degree)?;
                (rule.clone(), rule)
            }
            QuadratureDomain::InteriorFacet(plus, minus) => (
                QuadratureRule::for_facet(cell, plus, degree)?,
                QuadratureRule::for_facet(cell, minus, degree)?,
            ),
        };
        Ok(Self {
            cell,
            domain,
            plus,
            minus,
        })
    }

    /// Creates an integrator for the cell of the given basis functions.
    ///
    /// If `degree` is `None`, the degree is the sum of the degrees of the elements.
    pub fn for_basis_functions(
        basis_functions: &[BasisFunction],
        domain: QuadratureDomain,
        degree: Option<usize>,
    ) -> Result<Self, FormError> {
        let cell = basis_functions
            .first()
            .map(|v| v.element.cell())
            .ok_or_else(|| FormError::Unhandled("integration of a monomial without basis functions".to_string()))?;
        let degree = degree.unwrap_or_else(|| default_quadrature_degree(basis_functions));
        Self::new(cell, domain, degree)
    }

    pub fn cell(&self) -> ReferenceCell {
        self.cell
    }

    pub fn domain(&self) -> QuadratureDomain {
        self.domain
    }

    pub fn rule(&self) -> &QuadratureRule {
        &self.plus
    }
}

/// A basis function with all of its indices replaced by values.
struct ResolvedBasisFunction<'a> {
    element: &'a Element,
    basis: usize,
    component: Vec<usize>,
    derivatives: Vec<usize>,
    minus: bool,
}

fn resolve_index(index: &Index, i: &[usize], a: &[usize], b: &[usize]) -> Result<usize, FormError> {
    let values = match index.kind() {
        IndexKind::Fixed => return Ok(index.value()),
        IndexKind::Primary => i,
        IndexKind::Secondary => a,
        IndexKind::Auxiliary => b,
    };
    values
        .get(index.value())
        .copied()
        .ok_or_else(|| FormError::ReferenceTensor(format!("no value given for index {index}")))
}

fn out_of_bounds(what: &str, value: usize, dim: usize, v: &BasisFunction) -> FormError {
    FormError::ReferenceTensor(format!("{what} {value} is out of bounds (dimension {dim}) for {v}"))
}

impl ReferenceIntegrator {
    fn resolve<'a>(
        &self,
        v: &'a BasisFunction,
        i: &[usize],
        a: &[usize],
        b: &[usize],
    ) -> Result<ResolvedBasisFunction<'a>, FormError> {
        let element = &v.element;
        if element.cell() != self.cell {
            return Err(FormError::Unhandled(format!(
                "basis function {v} on a {} cell integrated over a {} cell",
                element.cell(),
                self.cell
            )));
        }

        let basis = resolve_index(&v.index, i, a, b)?;
        if basis >= element.space_dimension() {
            return Err(out_of_bounds("basis function", basis, element.space_dimension(), v));
        }

        let value_shape = element.value_shape();
        if v.components.len() != value_shape.len() {
            return Err(FormError::ReferenceTensor(format!(
                "basis function {v} has {} component indices, but its element has value rank {}",
                v.components.len(),
                value_shape.len()
            )));
        }
        let mut component = Vec::with_capacity(value_shape.len());
        for (index, &dim) in v.components.iter().zip(value_shape) {
            let value = resolve_index(index, i, a, b)?;
            if value >= dim {
                return Err(out_of_bounds("component", value, dim, v));
            }
            component.push(value);
        }

        let mut derivatives = Vec::with_capacity(v.derivatives.len());
        for derivative in &v.derivatives {
            let direction = resolve_index(&derivative.index, i, a, b)?;
            let dim = derivative.element.shape_dimension();
            if direction >= dim {
                return Err(out_of_bounds("derivative direction", direction, dim, v));
            }
            derivatives.push(direction);
        }

        Ok(ResolvedBasisFunction {
            element,
            basis,
            component,
            derivatives,
            minus: v.restriction == Restriction::Minus,
        })
    }
}

impl QuadratureEvaluator for ReferenceIntegrator {
    fn integrate(
        &self,
        basis_functions: &[BasisFunction],
        i: &[usize],
        a: &[usize],
        b: &[usize],
    ) -> Result<f64, FormError> {
        let resolved = basis_functions
            .iter()
            .map(|v| self.resolve(v, i, a, b))
            .collect::<Result<Vec<_>, _>>()?;

        let weights = self.plus.weights();
        let plus_points = self.plus.points();
        let minus_points = self.minus.points();
        let mut integral = 0.0;
        for (q, w) in weights.iter().enumerate() {
            let product = resolved.iter().fold(1.0, |product, v| {
                let xi = if v.minus { &minus_points[q] } else { &plus_points[q] };
                product
                    * v.element
                        .evaluate(v.basis, &v.component, &v.derivatives, xi.as_slice())
            });
            integral += w * product;
        }
        Ok(integral)
    }
}
