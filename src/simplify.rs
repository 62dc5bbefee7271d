//! Simplification of forms by index contraction, factorization, zero elimination, determinant
//! contraction and cancellation of derivative chains.
use crate::error::FormError;
use crate::form::{DomainType, Form, Monomial, Restriction, TransformKind};
use crate::index::{Index, IndexKind};
use crate::reassign::reassign_indices;
use itertools::izip;
use log::{debug, trace};
use std::convert::Infallible;

/// Simplifies a form in place.
///
/// After restriction normalization, index contraction, factorization, zero elimination,
/// determinant contraction and derivative-chain simplification are repeated until the form no
/// longer changes. The result is canonically indexed, and simplifying it again leaves it
/// unchanged.
///
/// Every monomial of the input must satisfy the summation convention, see
/// [`Monomial::check_index_balance`], and have a finite constant.
pub fn simplify(form: &mut Form) -> Result<(), FormError> {
    form.check_index_balance()?;
    if let Some(monomial) = form.monomials().iter().find(|m| !m.constant.is_finite()) {
        return Err(FormError::invariant("monomial has a non-finite constant").with_context(monomial));
    }
    debug!("Simplifying form with {} monomials", form.len());

    normalize_restrictions(form);

    let mut iterations = 0;
    loop {
        let previous = form.clone();
        contract_monomials(form)?;
        factorize_monomials(form);
        eliminate_zeros(form);
        for monomial in form.monomials_mut() {
            contract_determinants(monomial);
            simplify_derivatives(monomial);
        }
        reassign_indices(form);
        iterations += 1;
        if let Some(monomial) = form.monomials().iter().find(|m| !m.constant.is_finite()) {
            return Err(FormError::Simplification(format!(
                "factorization overflowed to a non-finite constant in {monomial}"
            )));
        }
        if *form == previous {
            break;
        }
    }

    form.check_index_balance().map_err(|err| {
        FormError::Simplification(format!("simplified form violates the summation convention: {err}"))
    })?;
    debug!(
        "Simplified form to {} monomials in {} iterations",
        form.len(),
        iterations
    );
    Ok(())
}

/// Replaces restrictions that are constant across the facet by the plus side on interior facet
/// integrals.
pub fn normalize_restrictions(form: &mut Form) {
    for monomial in form.monomials_mut() {
        if monomial.integral.domain == DomainType::InteriorFacet {
            for basis_function in &mut monomial.basis_functions {
                if basis_function.restriction == Restriction::Constant {
                    basis_function.restriction = Restriction::Plus;
                }
            }
        }
    }
}

/// Combines pairs of items until no pair can be combined.
///
/// Every item is compared against all later items in order. When `combine` succeeds, the
/// later item is dropped and the combined item replaces the earlier one in the result and is
/// compared against the remaining items.
pub fn contract_pairwise<T, E>(
    items: Vec<T>,
    mut combine: impl FnMut(&T, &T) -> Result<Option<T>, E>,
) -> Result<Vec<T>, E> {
    let mut remaining: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(remaining.len());
    for i in 0..remaining.len() {
        let Some(mut current) = remaining[i].take() else {
            continue;
        };
        for candidate in remaining.iter_mut().skip(i + 1) {
            if let Some(other) = candidate {
                if let Some(combined) = combine(&current, other)? {
                    current = combined;
                    *candidate = None;
                }
            }
        }
        result.push(current);
    }
    Ok(result)
}

/// Contracts pairs of monomials until no pair can be contracted. The form is left canonically
/// renumbered.
pub fn contract_monomials(form: &mut Form) -> Result<(), FormError> {
    loop {
        reassign_indices(form);
        let num_monomials = form.len();
        let monomials = form.replace_monomials(Vec::new());
        let contracted = contract_pairwise(monomials, |m, n| -> Result<Option<Monomial>, FormError> {
            if !contraction_likely(m, n) {
                return Ok(None);
            }
            let contracted = contract_indices(m, n)?;
            if let Some(q) = &contracted {
                trace!("Contracted {m} and {n} into {q}");
            }
            Ok(contracted)
        })?;
        form.replace_monomials(contracted);
        // Every contraction removes a monomial
        if form.len() == num_monomials {
            return Ok(());
        }
    }
}

/// Cheap test for whether two monomials could possibly be contracted.
pub fn contraction_likely(m: &Monomial, n: &Monomial) -> bool {
    m.integral == n.integral
        && m.constant == n.constant
        && m.determinants == n.determinants
        && m.coefficients.len() == n.coefficients.len()
        && m.transforms.len() == n.transforms.len()
        && m.basis_functions.len() == n.basis_functions.len()
        && m.basis_functions
            .iter()
            .zip(&n.basis_functions)
            .all(|(v, w)| {
                v.element == w.element
                    && v.index == w.index
                    && v.restriction == w.restriction
                    && v.components.len() == w.components.len()
                    && v.derivatives.len() == w.derivatives.len()
            })
}

/// A position in [`Monomial::indices`] at which two monomials carry different indices.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDifference<'a> {
    pub position: usize,
    pub left: &'a Index,
    pub right: &'a Index,
}

/// Lists the positions at which the indices of two monomials differ.
///
/// Returns `None` if the monomials differ in anything but their indices.
pub fn diff<'a>(m: &'a Monomial, n: &'a Monomial) -> Option<Vec<IndexDifference<'a>>> {
    if m.constant != n.constant || !m.same_structure(n) {
        return None;
    }
    let differences = izip!(0.., m.indices(), n.indices())
        .filter(|(_, left, right)| left != right)
        .map(|(position, left, right)| IndexDifference { position, left, right })
        .collect();
    Some(differences)
}

fn count_slot(monomial: &Monomial, index: &Index) -> usize {
    monomial
        .indices()
        .into_iter()
        .filter(|other| other.same_slot(index))
        .count()
}

/// Contracts two monomials that differ only in the values of one summed index.
///
/// The monomials may be contracted if they differ in exactly two index positions, carrying
/// one index `i0` in `m` and one index `i1` in `n`, and the ranges of `i0` and `i1` are
/// disjoint. The result is `m` with both occurrences replaced by an index ranging over the
/// union of both ranges. Returns `None` if the monomials cannot be contracted.
pub fn contract_indices(m: &Monomial, n: &Monomial) -> Result<Option<Monomial>, FormError> {
    let differences = match diff(m, n) {
        Some(differences) => differences,
        None => return Ok(None),
    };
    let [first, second] = differences.as_slice() else {
        return Ok(None);
    };
    if first.left != second.left || first.right != second.right {
        return Ok(None);
    }
    let (i0, i1) = (first.left, first.right);
    if i0.overlaps(i1) {
        return Ok(None);
    }
    // Other occurrences of a summation index would keep the old range
    if (!i0.is_fixed() && count_slot(m, i0) != 2) || (!i1.is_fixed() && count_slot(n, i1) != 2) {
        return Ok(None);
    }

    let fresh_id = m
        .max_index(IndexKind::Secondary)
        .into_iter()
        .chain(n.max_index(IndexKind::Secondary))
        .max()
        .map_or(0, |max| max + 1);
    let merged = i0.merged(i1, fresh_id);
    let positions = [first.position, second.position];

    let mut q = m.clone();
    for (position, index) in q.indices_mut().into_iter().enumerate() {
        if positions.contains(&position) {
            *index = merged.clone();
        }
    }
    q.check_index_balance()
        .map_err(|err| FormError::Simplification(format!("index contraction produced an invalid monomial: {err}")))?;
    Ok(Some(q))
}

/// Merges monomials that agree in everything but their constants.
pub fn factorize_monomials(form: &mut Form) {
    let monomials = form.replace_monomials(Vec::new());
    let factorized = contract_pairwise(monomials, |m, n| {
        if m.eq_ignoring_constant(n) {
            let mut q = m.clone();
            q.constant = m.constant + n.constant;
            trace!("Factorized {m} and {n}");
            Ok::<_, Infallible>(Some(q))
        } else {
            Ok(None)
        }
    })
    .unwrap_or_else(|never| match never {});
    form.replace_monomials(factorized);
}

/// Removes monomials whose constant is exactly zero.
pub fn eliminate_zeros(form: &mut Form) {
    let monomials = form.replace_monomials(Vec::new());
    let (zeros, non_zeros): (Vec<_>, Vec<_>) = monomials.into_iter().partition(|m| m.constant == 0.0);
    if !zeros.is_empty() {
        trace!("Eliminated {} monomials with zero constant", zeros.len());
    }
    form.replace_monomials(non_zeros);
}

/// Multiplies compatible determinants of the monomial.
pub fn contract_determinants(monomial: &mut Monomial) {
    let determinants = std::mem::take(&mut monomial.determinants);
    monomial.determinants = contract_pairwise(determinants, |d0, d1| Ok::<_, Infallible>(d0.multiply(d1)))
        .unwrap_or_else(|never| match never {});
}

/// Cancels chains `(dX_L/dx_M) (dx_M/dX_N)` acting on a reference derivative `d/dX_L`, turning
/// the derivative into `d/dX_N`.
///
/// At most one pair of transforms is consumed per derivative.
pub fn simplify_derivatives(monomial: &mut Monomial) {
    for b in 0..monomial.basis_functions.len() {
        let restriction = monomial.basis_functions[b].restriction;
        for d in 0..monomial.basis_functions[b].derivatives.len() {
            let l = &monomial.basis_functions[b].derivatives[d].index;
            if !l.is_kind(IndexKind::Secondary) {
                continue;
            }

            let transforms = &monomial.transforms;
            let Some(first) = transforms.iter().position(|t| {
                t.kind == TransformKind::JInv
                    && t.index0.same_slot(l)
                    && t.restriction == restriction
                    && !t.index1.is_fixed()
            }) else {
                continue;
            };
            let m = &transforms[first].index1;
            let Some(second) = transforms.iter().position(|t| {
                t.kind == TransformKind::J
                    && t.index1.same_slot(m)
                    && t.restriction == restriction
                    && !t.index0.is_fixed()
            }) else {
                continue;
            };

            let n = transforms[second].index0.clone();
            trace!(
                "Cancelled transforms {} and {} acting on derivative {}",
                transforms[first],
                transforms[second],
                l
            );
            monomial.basis_functions[b].derivatives[d].index = n;
            let (high, low) = (first.max(second), first.min(second));
            monomial.transforms.remove(high);
            monomial.transforms.remove(low);
        }
    }
}
