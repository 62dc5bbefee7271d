//! Typed indices and their ranges.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The role an index plays in a monomial.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// Indexes a form argument (test/trial function) and becomes an axis of the output tensor.
    Primary,
    /// A summation index shared between the reference tensor and the geometry tensor.
    Secondary,
    /// A summation index that is summed out entirely inside the reference tensor.
    Auxiliary,
    /// A literal, already resolved component value.
    Fixed,
}

/// A typed index with a range of admissible values.
///
/// For [`IndexKind::Fixed`] indices, `value` is the literal value and the range is `[value]`.
/// For all other kinds, `value` is the identifier of the index.
///
/// Equality compares kind, value *and* range. Whether two indices refer to the same
/// summation slot regardless of their range is tested with [`Index::same_slot`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Index {
    kind: IndexKind,
    value: usize,
    range: Vec<usize>,
}

impl Index {
    pub fn new(kind: IndexKind, value: usize, range: impl IntoIterator<Item = usize>) -> Self {
        if kind == IndexKind::Fixed {
            return Self::fixed(value);
        }
        Self {
            kind,
            value,
            range: range.into_iter().collect(),
        }
    }

    pub fn primary(id: usize, range: impl IntoIterator<Item = usize>) -> Self {
        Self::new(IndexKind::Primary, id, range)
    }

    pub fn secondary(id: usize, range: impl IntoIterator<Item = usize>) -> Self {
        Self::new(IndexKind::Secondary, id, range)
    }

    pub fn auxiliary(id: usize, range: impl IntoIterator<Item = usize>) -> Self {
        Self::new(IndexKind::Auxiliary, id, range)
    }

    pub fn fixed(value: usize) -> Self {
        Self {
            kind: IndexKind::Fixed,
            value,
            range: vec![value],
        }
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// The identifier of the index, or its literal value if it is fixed.
    pub fn value(&self) -> usize {
        self.value
    }

    pub fn range(&self) -> &[usize] {
        &self.range
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == IndexKind::Fixed
    }

    pub fn is_kind(&self, kind: IndexKind) -> bool {
        self.kind == kind
    }

    /// Whether the two indices denote the same slot, i.e. have the same kind and value.
    pub fn same_slot(&self, other: &Index) -> bool {
        self.kind == other.kind && self.value == other.value
    }

    /// Whether the ranges of the two indices have any value in common.
    pub fn overlaps(&self, other: &Index) -> bool {
        self.range.iter().any(|v| other.range.contains(v))
    }

    pub(crate) fn set_value(&mut self, value: usize) {
        debug_assert!(!self.is_fixed(), "fixed indices cannot be relabeled");
        self.value = value;
    }

    pub(crate) fn set_kind(&mut self, kind: IndexKind) {
        debug_assert!(!self.is_fixed() && kind != IndexKind::Fixed);
        self.kind = kind;
    }

    /// Returns a copy of `self` whose range is the sorted union of both ranges.
    ///
    /// Fixed indices cannot carry a range of more than one value, so merging into a fixed
    /// index produces a secondary index with the given `fresh_id` instead.
    pub fn merged(&self, other: &Index, fresh_id: usize) -> Index {
        let mut range: Vec<usize> = self.range.iter().chain(&other.range).copied().collect();
        range.sort_unstable();
        range.dedup();
        match self.kind {
            IndexKind::Fixed => Index::secondary(fresh_id, range),
            kind => Index::new(kind, self.value, range),
        }
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            IndexKind::Primary => write!(f, "i{}", self.value),
            IndexKind::Secondary => write!(f, "a{}", self.value),
            IndexKind::Auxiliary => write!(f, "b{}", self.value),
            IndexKind::Fixed => write!(f, "{}", self.value),
        }
    }
}

/// Hands out fresh indices while a form is being built.
///
/// Identifiers are only required to be unique within one form; the simplifier renumbers all
/// indices canonically, so the actual numbers handed out here never reach the output.
#[derive(Debug, Default, Clone)]
pub struct IndexGenerator {
    next_primary: usize,
    next_secondary: usize,
    next_auxiliary: usize,
}

impl IndexGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primary(&mut self, range: impl IntoIterator<Item = usize>) -> Index {
        let id = self.next_primary;
        self.next_primary += 1;
        Index::primary(id, range)
    }

    pub fn secondary(&mut self, range: impl IntoIterator<Item = usize>) -> Index {
        let id = self.next_secondary;
        self.next_secondary += 1;
        Index::secondary(id, range)
    }

    pub fn auxiliary(&mut self, range: impl IntoIterator<Item = usize>) -> Index {
        let id = self.next_auxiliary;
        self.next_auxiliary += 1;
        Index::auxiliary(id, range)
    }
}

impl From<usize> for Index {
    fn from(value: usize) -> Self {
        Index::fixed(value)
    }
}
