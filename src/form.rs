//! The symbolic data model: monomials built from basis functions, transforms, coefficients and
//! determinants, and forms as sums of monomials.
use crate::element::Element;
use crate::error::FormError;
use crate::index::{Index, IndexKind};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The side of an interior facet on which a quantity is evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Restriction {
    Unrestricted,
    Plus,
    Minus,
    /// The quantity is the same on both sides of the facet.
    Constant,
}

impl Default for Restriction {
    fn default() -> Self {
        Self::Unrestricted
    }
}

impl Display for Restriction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => Ok(()),
            Self::Plus => write!(f, "(+)"),
            Self::Minus => write!(f, "(-)"),
            Self::Constant => write!(f, "(0)"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DomainType {
    Cell,
    ExteriorFacet,
    InteriorFacet,
}

/// The measure a monomial is integrated against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Integral {
    pub domain: DomainType,
    /// The number of facets of the cell, for facet integrals. Zero for cell integrals.
    pub num_facets: usize,
}

impl Integral {
    pub fn cell() -> Self {
        Self {
            domain: DomainType::Cell,
            num_facets: 0,
        }
    }

    pub fn exterior_facet(num_facets: usize) -> Self {
        Self {
            domain: DomainType::ExteriorFacet,
            num_facets,
        }
    }

    pub fn interior_facet(num_facets: usize) -> Self {
        Self {
            domain: DomainType::InteriorFacet,
            num_facets,
        }
    }
}

impl Display for Integral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.domain {
            DomainType::Cell => write!(f, "dx"),
            DomainType::ExteriorFacet => write!(f, "ds"),
            DomainType::InteriorFacet => write!(f, "dS"),
        }
    }
}

/// Differentiation of a basis function in the reference direction given by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Derivative {
    pub element: Element,
    pub index: Index,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BasisFunction {
    pub element: Element,
    /// The argument slot: primary for test/trial functions, secondary or auxiliary for
    /// functions that are summed over.
    pub index: Index,
    /// One index per axis of the value shape of the element.
    pub components: Vec<Index>,
    pub restriction: Restriction,
    pub derivatives: Vec<Derivative>,
}

impl BasisFunction {
    pub fn new(element: &Element, index: Index) -> Self {
        Self {
            element: element.clone(),
            index,
            components: Vec::new(),
            restriction: Restriction::Unrestricted,
            derivatives: Vec::new(),
        }
    }

    /// Creates an argument of the form, with a fresh primary index ranging over the basis of
    /// the element.
    pub fn argument(element: &Element, id: usize) -> Self {
        Self::new(element, Index::primary(id, 0..element.space_dimension()))
    }

    pub fn with_component(mut self, component: impl Into<Index>) -> Self {
        self.components.push(component.into());
        self
    }

    pub fn restricted(mut self, restriction: Restriction) -> Self {
        self.restriction = restriction;
        self
    }

    /// All indices of the basis function: argument, components, then derivatives.
    pub fn indices(&self) -> impl Iterator<Item = &Index> {
        std::iter::once(&self.index)
            .chain(&self.components)
            .chain(self.derivatives.iter().map(|d| &d.index))
    }

    pub fn indices_mut(&mut self) -> impl Iterator<Item = &mut Index> {
        std::iter::once(&mut self.index)
            .chain(&mut self.components)
            .chain(self.derivatives.iter_mut().map(|d| &mut d.index))
    }
}

impl Display for BasisFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for derivative in &self.derivatives {
            write!(f, "(d/dX_{})", derivative.index)?;
        }
        let name = if self.index.is_kind(IndexKind::Primary) { "v" } else { "w" };
        write!(f, "{name}[{}]_{}", self.element.id(), self.index)?;
        if !self.components.is_empty() {
            write!(f, "[{}]", self.components.iter().join(", "))?;
        }
        write!(f, "{}", self.restriction)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransformKind {
    /// The Jacobian `dx_{index1} / dX_{index0}`.
    J,
    /// The inverse Jacobian `dX_{index0} / dx_{index1}`.
    JInv,
}

/// A factor of the coordinate pullback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Transform {
    pub kind: TransformKind,
    pub index0: Index,
    pub index1: Index,
    pub restriction: Restriction,
}

impl Transform {
    pub fn new(kind: TransformKind, index0: Index, index1: Index, restriction: Restriction) -> Self {
        Self {
            kind,
            index0,
            index1,
            restriction,
        }
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransformKind::J => write!(f, "(dx_{}/dX_{})", self.index1, self.index0)?,
            TransformKind::JInv => write!(f, "(dX_{}/dx_{})", self.index0, self.index1)?,
        }
        write!(f, "{}", self.restriction)
    }
}

/// A power of the Jacobian determinant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Determinant {
    pub power: i32,
    pub restriction: Restriction,
}

impl Determinant {
    pub fn new(power: i32, restriction: Restriction) -> Self {
        Self { power, restriction }
    }

    /// Multiplies two determinants.
    ///
    /// Determinants combine if they have the same restriction or if either of them is
    /// constant across the facet, in which case the product takes the other restriction.
    /// Returns `None` for incompatible restrictions.
    pub fn multiply(&self, other: &Determinant) -> Option<Determinant> {
        let restriction = match (self.restriction, other.restriction) {
            (a, b) if a == b => a,
            (Restriction::Constant, b) => b,
            (a, Restriction::Constant) => a,
            _ => return None,
        };
        Some(Determinant::new(self.power + other.power, restriction))
    }
}

impl Display for Determinant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "det{}^{}", self.restriction, self.power)
    }
}

/// The contribution of a given (non-argument) function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Coefficient {
    pub n0: usize,
    pub n1: usize,
    pub index: Index,
}

impl Display for Coefficient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "c{}_{}[{}]", self.n0, self.n1, self.index)
    }
}

/// One product term of a multilinear form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Monomial {
    pub constant: f64,
    pub basis_functions: Vec<BasisFunction>,
    pub transforms: Vec<Transform>,
    pub coefficients: Vec<Coefficient>,
    pub determinants: Vec<Determinant>,
    pub integral: Integral,
}

impl Monomial {
    pub fn new(integral: Integral) -> Self {
        Self {
            constant: 1.0,
            basis_functions: Vec::new(),
            transforms: Vec::new(),
            coefficients: Vec::new(),
            determinants: Vec::new(),
            integral,
        }
    }

    /// All indices of the monomial in canonical order: for each basis function its argument,
    /// components and derivatives, then both indices of each transform, then the coefficient
    /// indices.
    pub fn indices(&self) -> Vec<&Index> {
        let mut indices: Vec<&Index> = Vec::new();
        for basis_function in &self.basis_functions {
            indices.extend(basis_function.indices());
        }
        for transform in &self.transforms {
            indices.push(&transform.index0);
            indices.push(&transform.index1);
        }
        indices.extend(self.coefficients.iter().map(|c| &c.index));
        indices
    }

    /// Mutable access to all indices, in the same order as [`Monomial::indices`].
    pub fn indices_mut(&mut self) -> Vec<&mut Index> {
        let mut indices: Vec<&mut Index> = Vec::new();
        for basis_function in &mut self.basis_functions {
            indices.extend(basis_function.indices_mut());
        }
        for transform in &mut self.transforms {
            indices.push(&mut transform.index0);
            indices.push(&mut transform.index1);
        }
        indices.extend(self.coefficients.iter_mut().map(|c| &mut c.index));
        indices
    }

    /// The number of leading entries of [`Monomial::indices`] that belong to basis functions.
    pub fn num_basis_function_indices(&self) -> usize {
        self.basis_functions
            .iter()
            .map(|v| 1 + v.components.len() + v.derivatives.len())
            .sum()
    }

    /// The largest id of any index of the given kind.
    pub fn max_index(&self, kind: IndexKind) -> Option<usize> {
        self.indices()
            .into_iter()
            .filter(|index| index.is_kind(kind))
            .map(Index::value)
            .max()
    }

    /// Whether the monomials agree in everything but their indices and constants.
    ///
    /// If they do, [`Monomial::indices`] of both monomials line up position by position.
    pub fn same_structure(&self, other: &Monomial) -> bool {
        let same_basis_functions = self.basis_functions.len() == other.basis_functions.len()
            && self
                .basis_functions
                .iter()
                .zip(&other.basis_functions)
                .all(|(v, w)| {
                    v.element == w.element
                        && v.restriction == w.restriction
                        && v.components.len() == w.components.len()
                        && v.derivatives.len() == w.derivatives.len()
                        && v.derivatives
                            .iter()
                            .zip(&w.derivatives)
                            .all(|(d, e)| d.element == e.element)
                });
        let same_transforms = self.transforms.len() == other.transforms.len()
            && self
                .transforms
                .iter()
                .zip(&other.transforms)
                .all(|(s, t)| s.kind == t.kind && s.restriction == t.restriction);
        let same_coefficients = self.coefficients.len() == other.coefficients.len()
            && self
                .coefficients
                .iter()
                .zip(&other.coefficients)
                .all(|(c, d)| c.n0 == d.n0 && c.n1 == d.n1);

        self.integral == other.integral
            && self.determinants == other.determinants
            && same_basis_functions
            && same_transforms
            && same_coefficients
    }

    /// Structural equality disregarding the numeric constant.
    pub fn eq_ignoring_constant(&self, other: &Monomial) -> bool {
        self.integral == other.integral
            && self.basis_functions == other.basis_functions
            && self.transforms == other.transforms
            && self.coefficients == other.coefficients
            && self.determinants == other.determinants
    }

    /// Verifies that every non-fixed index occurs once (free) or twice (summed), and that all
    /// occurrences of an index carry the same range.
    pub fn check_index_balance(&self) -> Result<(), FormError> {
        let mut occurrences: FxHashMap<(IndexKind, usize), Vec<&Index>> = FxHashMap::default();
        for index in self.indices().into_iter().filter(|index| !index.is_fixed()) {
            occurrences
                .entry((index.kind(), index.value()))
                .or_default()
                .push(index);
        }

        for occurrence in occurrences.values().sorted_by_key(|o| (o[0].kind(), o[0].value())) {
            let index = occurrence[0];
            if occurrence.len() > 2 {
                return Err(FormError::invariant(format!(
                    "index {index} occurs {} times in a monomial",
                    occurrence.len()
                ))
                .with_context(self));
            }
            if occurrence.iter().any(|other| other.range() != index.range()) {
                return Err(
                    FormError::invariant(format!("index {index} occurs with different ranges")).with_context(self),
                );
            }
        }
        Ok(())
    }
}

impl Display for Monomial {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)?;
        for determinant in &self.determinants {
            write!(f, " * {determinant}")?;
        }
        for coefficient in &self.coefficients {
            write!(f, " * {coefficient}")?;
        }
        for transform in &self.transforms {
            write!(f, " * {transform}")?;
        }
        for basis_function in &self.basis_functions {
            write!(f, " * {basis_function}")?;
        }
        write!(f, " * {}", self.integral)
    }
}

/// A sum of monomials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Form {
    monomials: Vec<Monomial>,
}

impl Form {
    pub fn new(monomials: Vec<Monomial>) -> Self {
        Self { monomials }
    }

    pub fn monomials(&self) -> &[Monomial] {
        &self.monomials
    }

    pub fn monomials_mut(&mut self) -> &mut [Monomial] {
        &mut self.monomials
    }

    pub fn into_monomials(self) -> Vec<Monomial> {
        self.monomials
    }

    /// Replaces the monomials of the form, returning the previous ones.
    pub fn replace_monomials(&mut self, monomials: Vec<Monomial>) -> Vec<Monomial> {
        std::mem::replace(&mut self.monomials, monomials)
    }

    pub fn push(&mut self, monomial: Monomial) {
        self.monomials.push(monomial);
    }

    pub fn len(&self) -> usize {
        self.monomials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monomials.is_empty()
    }

    /// The number of arguments of the form, i.e. one plus the largest primary index id.
    pub fn rank(&self) -> usize {
        self.monomials
            .iter()
            .filter_map(|m| m.max_index(IndexKind::Primary))
            .max()
            .map_or(0, |max| max + 1)
    }

    /// The distinct integrals of the form, in order of first occurrence.
    pub fn integrals(&self) -> Vec<Integral> {
        self.monomials.iter().map(|m| m.integral).unique().collect()
    }

    pub fn check_index_balance(&self) -> Result<(), FormError> {
        for (position, monomial) in self.monomials.iter().enumerate() {
            monomial
                .check_index_balance()
                .map_err(|err| err.with_context(format!("monomial {position} of the form")))?;
        }
        Ok(())
    }
}

impl Display for Form {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.monomials.is_empty() {
            return write!(f, "0");
        }
        write!(f, "{}", self.monomials.iter().join(" + "))
    }
}
