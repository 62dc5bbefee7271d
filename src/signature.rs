//! Structural signatures of monomials.
//!
//! A signature captures everything about a monomial that determines its reference tensor:
//! the integral and, for every basis function, its element, restriction and the indices of
//! its argument, components and derivatives. Transforms, coefficients, determinants and the
//! constant only enter the geometry tensor and are not part of the signature. Basis
//! functions are sorted, since the reference tensor does not depend on their order.
use crate::element::ElementId;
use crate::form::{BasisFunction, Integral, Monomial, Restriction};
use crate::index::{Index, IndexKind};
use serde::Serialize;

/// An index as seen by a signature. Secondary indices of soft signatures have no value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IndexSignature {
    pub kind: IndexKind,
    pub value: Option<usize>,
    pub range: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BasisFunctionSignature {
    pub element: ElementId,
    pub restriction: Restriction,
    pub index: IndexSignature,
    pub components: Vec<IndexSignature>,
    pub derivatives: Vec<IndexSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonomialSignature {
    pub integral: Integral,
    pub basis_functions: Vec<BasisFunctionSignature>,
}

fn signature(monomial: &Monomial, index_signature: impl Fn(&Index) -> IndexSignature) -> MonomialSignature {
    let basis_function_signature = |v: &BasisFunction| BasisFunctionSignature {
        element: v.element.id(),
        restriction: v.restriction,
        index: index_signature(&v.index),
        components: v.components.iter().map(&index_signature).collect(),
        derivatives: v.derivatives.iter().map(|d| index_signature(&d.index)).collect(),
    };
    let mut basis_functions: Vec<_> = monomial
        .basis_functions
        .iter()
        .map(basis_function_signature)
        .collect();
    basis_functions.sort();
    MonomialSignature {
        integral: monomial.integral,
        basis_functions,
    }
}

/// A signature including the exact numbering of all indices.
///
/// Monomials with equal hard signatures have identical reference tensors up to their constant.
pub fn compute_hard_signature(monomial: &Monomial) -> MonomialSignature {
    signature(monomial, |index| IndexSignature {
        kind: index.kind(),
        value: Some(index.value()),
        range: index.range().to_vec(),
    })
}

/// A signature that does not depend on the numbering of secondary indices.
///
/// Monomials with equal soft signatures have reference tensors of the same shape, which agree
/// after a suitable renaming of secondary indices.
pub fn compute_soft_signature(monomial: &Monomial) -> MonomialSignature {
    signature(monomial, |index| IndexSignature {
        kind: index.kind(),
        value: (!index.is_kind(IndexKind::Secondary)).then(|| index.value()),
        range: index.range().to_vec(),
    })
}
