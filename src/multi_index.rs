//! Multi-indices driving the enumeration of reference tensor entries.
use crate::index::{Index, IndexKind};
use itertools::Itertools;
use serde::Serialize;

/// An ordered list of indices together with the dimensions of their ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiIndex {
    indices: Vec<Index>,
    dims: Vec<usize>,
}

impl MultiIndex {
    pub fn new(indices: Vec<Index>) -> Self {
        let dims = indices.iter().map(|index| index.range().len()).collect();
        Self { indices, dims }
    }

    /// Creates the multi-index `(0, ..., rank - 1)` of the given kind, where index `k` ranges
    /// over `0 .. dims[k]`.
    pub fn from_dims(kind: IndexKind, dims: &[usize]) -> Self {
        let indices = dims
            .iter()
            .enumerate()
            .map(|(id, &dim)| Index::new(kind, id, 0..dim))
            .collect();
        Self::new(indices)
    }

    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Creates a multi-index whose axes have the given lengths.
    ///
    /// The range of index `k` may be a proper subset of `0 .. dims[k]`, as happens for indices
    /// merged from a partial sum.
    pub fn with_dims(indices: Vec<Index>, dims: Vec<usize>) -> Self {
        debug_assert_eq!(indices.len(), dims.len());
        Self { indices, dims }
    }

    /// Whether every value lies in the range of the corresponding index.
    pub fn contains(&self, values: &[usize]) -> bool {
        values.len() == self.indices.len()
            && self
                .indices
                .iter()
                .zip(values)
                .all(|(index, value)| index.range().contains(value))
    }

    /// The number of positions along the axes, which is 1 for an empty multi-index.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All combinations of index values, with the last index varying fastest.
    ///
    /// An empty multi-index has exactly one (empty) combination.
    pub fn values(&self) -> Vec<Vec<usize>> {
        if self.indices.is_empty() {
            return vec![Vec::new()];
        }
        self.indices
            .iter()
            .map(|index| index.range().to_vec())
            .multi_cartesian_product()
            .collect()
    }

    /// All positions along the axes, `0 .. dims[k]` for index `k`, with the last index varying
    /// fastest.
    pub fn positions(&self) -> Vec<Vec<usize>> {
        if self.dims.is_empty() {
            return vec![Vec::new()];
        }
        self.dims
            .iter()
            .map(|&dim| 0..dim)
            .multi_cartesian_product()
            .collect()
    }
}
