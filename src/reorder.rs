//! Reordering of secondary indices to find monomials sharing a reference tensor.
use crate::error::FormError;
use crate::form::{Form, Monomial};
use crate::index::IndexKind;
use crate::reassign::reassign_index;
use crate::signature::{compute_hard_signature, compute_soft_signature, MonomialSignature};
use core::fmt;
use itertools::Itertools;
use log::debug;
use std::error::Error;
use std::marker::PhantomData;

/// A representation of an index permutation.
///
/// The permutation stores an array `perm` such that index `i` in `0 .. n` is relabeled to
/// `perm[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InvalidPermutation {
    marker: PhantomData<()>,
}

impl fmt::Display for InvalidPermutation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid permutation")
    }
}

impl Error for InvalidPermutation {}

impl Permutation {
    pub fn from_vec(perm: Vec<usize>) -> Result<Self, InvalidPermutation> {
        let mut visited = vec![false; perm.len()];
        for &index in &perm {
            match visited.get_mut(index) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(InvalidPermutation { marker: PhantomData });
                }
            }
        }
        Ok(Self { perm })
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// All permutations of `0 .. n` in lexicographic order.
    pub fn all(n: usize) -> impl Iterator<Item = Permutation> {
        (0..n).permutations(n).map(|perm| Permutation { perm })
    }

    /// Relabels the secondary indices `0 .. n` of the monomial according to the permutation.
    ///
    /// Indices are first moved to `n .. 2n` so that relabeling never merges two indices.
    pub fn relabel_secondary(&self, monomial: &Monomial) -> Result<Monomial, FormError> {
        let n = self.len();
        let mut relabeled = monomial.clone();
        for i in 0..n {
            if reassign_index(&mut relabeled, i, i + n, IndexKind::Secondary) == 0 {
                return Err(FormError::invariant(format!("secondary index a{i} does not occur in monomial"))
                    .with_context(monomial));
            }
        }
        for (i, &target) in self.perm.iter().enumerate() {
            reassign_index(&mut relabeled, i + n, target, IndexKind::Secondary);
        }
        Ok(relabeled)
    }
}

fn num_secondary_indices(monomial: &Monomial) -> usize {
    monomial
        .max_index(IndexKind::Secondary)
        .map_or(0, |max| max + 1)
}

/// Searches for a relabeling of the secondary indices of `q` that makes its hard signature
/// equal to `p_hard`. Permutations are tried in lexicographic order.
fn find_reordering(p: &Monomial, q: &Monomial, p_hard: &MonomialSignature) -> Result<Monomial, FormError> {
    let n = num_secondary_indices(p);
    if n != num_secondary_indices(q) {
        return Err(FormError::invariant(
            "monomials have common soft signature but different numbers of secondary indices",
        )
        .with_context(p)
        .with_context(q));
    }

    if n == 0 && compute_hard_signature(q) == *p_hard {
        return Ok(q.clone());
    }

    for permutation in Permutation::all(n).filter(|perm| !perm.is_empty()) {
        let relabeled = permutation.relabel_secondary(q)?;
        if compute_hard_signature(&relabeled) == *p_hard {
            return Ok(relabeled);
        }
    }

    Err(
        FormError::invariant("unable to find a reordering of indices for monomials with common soft signature")
            .with_context(p)
            .with_context(q)
            .with_context(format!("{p_hard:?}")),
    )
}

/// Reorders secondary indices so that monomials with a common reference tensor have equal hard
/// signatures, and computes the factorization of the form.
///
/// Entry `j` of the returned factorization is `Some(i)` if monomial `j` shares the reference
/// tensor of the earlier monomial `i`, and `None` if monomial `j` is a representative. Matched
/// monomials are replaced by their relabeled versions.
///
/// Secondary indices are expected to be numbered `0 .. n` within each monomial, as produced by
/// [`reassign_indices`](crate::reassign::reassign_indices).
pub fn reorder_indices(form: &mut Form) -> Result<Vec<Option<usize>>, FormError> {
    let num_monomials = form.len();
    let mut factorization = vec![None; num_monomials];

    for i in 0..num_monomials {
        if factorization[i].is_some() {
            continue;
        }
        let p = form.monomials()[i].clone();
        let p_soft = compute_soft_signature(&p);
        let p_hard = compute_hard_signature(&p);

        for j in (i + 1)..num_monomials {
            if factorization[j].is_some() {
                continue;
            }
            let q = &form.monomials()[j];
            if compute_hard_signature(q) == p_hard {
                debug!("Hard signatures match for terms {i} and {j}, factorizing");
                factorization[j] = Some(i);
            } else if compute_soft_signature(q) == p_soft {
                debug!("Soft signatures match for terms {i} and {j}, reordering and factorizing");
                let reordered = find_reordering(&p, q, &p_hard)?;
                form.monomials_mut()[j] = reordered;
                factorization[j] = Some(i);
            }
        }
    }

    Ok(factorization)
}
