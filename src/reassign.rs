//! Canonical renumbering of indices.
use crate::error::FormError;
use crate::form::{Form, Monomial};
use crate::index::IndexKind;
use rustc_hash::{FxHashMap, FxHashSet};

/// Renumbers all indices of the form in order of first occurrence.
///
/// Primary indices are numbered `0..p` across the whole form, secondary and auxiliary indices
/// `0..s` and `0..b` within each monomial. Monomials are scanned in order, and each monomial in
/// the order of [`Monomial::indices`]. Fixed indices are left untouched.
pub fn reassign_indices(form: &mut Form) {
    let mut primary = FxHashMap::default();
    for monomial in form.monomials_mut() {
        let mut secondary = FxHashMap::default();
        let mut auxiliary = FxHashMap::default();
        for index in monomial.indices_mut() {
            let numbering = match index.kind() {
                IndexKind::Primary => &mut primary,
                IndexKind::Secondary => &mut secondary,
                IndexKind::Auxiliary => &mut auxiliary,
                IndexKind::Fixed => continue,
            };
            let next = numbering.len();
            let value = *numbering.entry(index.value()).or_insert(next);
            index.set_value(value);
        }
    }
}

/// Renames every occurrence of index `from` of the given kind to `to`.
///
/// Returns the number of occurrences that were renamed.
pub fn reassign_index(monomial: &mut Monomial, from: usize, to: usize, kind: IndexKind) -> usize {
    let mut renamed = 0;
    for index in monomial.indices_mut() {
        if index.is_kind(kind) && index.value() == from {
            index.set_value(to);
            renamed += 1;
        }
    }
    renamed
}

/// Turns secondary indices that are summed entirely within basis functions into auxiliary
/// indices, and renumbers the form canonically.
///
/// Such indices never meet the geometry tensor, so they are summed out when evaluating the
/// reference tensor. Returns an error if an index is not balanced.
pub fn mark_auxiliary_indices(form: &mut Form) -> Result<(), FormError> {
    for monomial in form.monomials_mut() {
        monomial.check_index_balance()?;

        let num_basis_indices = monomial.num_basis_function_indices();
        let mut in_basis: FxHashMap<usize, usize> = FxHashMap::default();
        let mut elsewhere: FxHashSet<usize> = FxHashSet::default();
        for (position, index) in monomial.indices().into_iter().enumerate() {
            if index.is_kind(IndexKind::Secondary) {
                if position < num_basis_indices {
                    *in_basis.entry(index.value()).or_default() += 1;
                } else {
                    elsewhere.insert(index.value());
                }
            }
        }

        let mut next_auxiliary = monomial
            .max_index(IndexKind::Auxiliary)
            .map_or(0, |max| max + 1);
        let mut fresh: FxHashMap<usize, usize> = FxHashMap::default();
        for index in monomial.indices_mut() {
            let value = index.value();
            let summed_in_basis = index.is_kind(IndexKind::Secondary)
                && in_basis.get(&value) == Some(&2)
                && !elsewhere.contains(&value);
            if summed_in_basis {
                let id = *fresh.entry(value).or_insert_with(|| {
                    next_auxiliary += 1;
                    next_auxiliary - 1
                });
                index.set_kind(IndexKind::Auxiliary);
                index.set_value(id);
            }
        }
    }
    reassign_indices(form);
    Ok(())
}
