//! Precomputation of reference tensors by quadrature.
use crate::error::FormError;
use crate::form::{BasisFunction, Integral, Monomial};
use crate::index::{Index, IndexKind};
use crate::integrate::QuadratureEvaluator;
use crate::multi_index::MultiIndex;
use itertools::iproduct;
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// A dense tensor stored in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenseTensor {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl DenseTensor {
    pub fn from_data(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, FormError> {
        let len: usize = shape.iter().product();
        if len != data.len() {
            return Err(FormError::ReferenceTensor(format!(
                "tensor of shape {shape:?} cannot hold {} entries",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn linear_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut linear = 0;
        for (&k, &dim) in index.iter().zip(&self.shape) {
            if k >= dim {
                return None;
            }
            linear = linear * dim + k;
        }
        Some(linear)
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.linear_index(index).map(|k| self.data[k])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut f64> {
        self.linear_index(index).map(move |k| &mut self.data[k])
    }
}

/// The reference tensor of a monomial.
///
/// The tensor `A0` has one axis per primary index followed by one axis per secondary index,
/// with entries
///
/// ```text
/// A0[i, a] = constant * sum_b integral(basis functions at (i, a, b))
/// ```
///
/// where `b` runs over all values of the auxiliary indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTensor {
    pub i: MultiIndex,
    pub a: MultiIndex,
    pub b: MultiIndex,
    pub constant: f64,
    pub basis_functions: Vec<BasisFunction>,
    pub integral: Integral,
    pub a0: DenseTensor,
}

/// Finds the first occurrence of index `id` of the given kind in the basis functions, together
/// with the dimension of the slot it occupies: the space dimension for an argument, the value
/// dimension for a component and the shape dimension for a derivative.
fn find_occurrence(
    basis_functions: &[BasisFunction],
    kind: IndexKind,
    id: usize,
) -> Result<(&Index, usize), FormError> {
    let matches = |index: &Index| index.is_kind(kind) && index.value() == id;
    for v in basis_functions {
        if matches(&v.index) {
            return Ok((&v.index, v.element.space_dimension()));
        }
        for (component, index) in v.components.iter().enumerate() {
            if matches(index) {
                let dim = v.element.value_shape().get(component).copied().ok_or_else(|| {
                    FormError::ReferenceTensor(format!(
                        "component {component} of {v} exceeds the value rank of its element"
                    ))
                })?;
                return Ok((index, dim));
            }
        }
        for derivative in &v.derivatives {
            if matches(&derivative.index) {
                return Ok((&derivative.index, derivative.element.shape_dimension()));
            }
        }
    }
    Err(FormError::ReferenceTensor(format!(
        "unable to find dimension of {}",
        Index::new(kind, id, [])
    )))
}

/// Finds the dimension of index `id` of the given kind from its first occurrence in a basis
/// function.
pub fn find_dimension(basis_functions: &[BasisFunction], kind: IndexKind, id: usize) -> Result<usize, FormError> {
    find_occurrence(basis_functions, kind, id).map(|(_, dim)| dim)
}

/// Creates the multi-index over all indices of the given kind used by the basis functions.
///
/// Each axis spans the dimension of the slot the index occupies, while the index keeps the
/// range of its first occurrence.
pub fn create_multi_index(basis_functions: &[BasisFunction], kind: IndexKind) -> Result<MultiIndex, FormError> {
    let rank = basis_functions
        .iter()
        .flat_map(|v| v.indices())
        .filter(|index| index.is_kind(kind))
        .map(|index| index.value() + 1)
        .max()
        .unwrap_or(0);
    let mut indices = Vec::with_capacity(rank);
    let mut dims = Vec::with_capacity(rank);
    for id in 0..rank {
        let (index, dim) = find_occurrence(basis_functions, kind, id)?;
        if let Some(&value) = index.range().iter().find(|&&value| value >= dim) {
            return Err(FormError::ReferenceTensor(format!(
                "value {value} in the range of {index} exceeds its dimension {dim}"
            )));
        }
        indices.push(index.clone());
        dims.push(dim);
    }
    Ok(MultiIndex::with_dims(indices, dims))
}

/// The multi-indices of a monomial and the auxiliary values summed over in every entry.
struct Layout {
    i: MultiIndex,
    a: MultiIndex,
    b: MultiIndex,
    b_values: Vec<Vec<usize>>,
}

impl Layout {
    fn new(monomial: &Monomial) -> Result<Self, FormError> {
        let basis_functions = &monomial.basis_functions;
        let i = create_multi_index(basis_functions, IndexKind::Primary)?;
        let a = create_multi_index(basis_functions, IndexKind::Secondary)?;
        let b = create_multi_index(basis_functions, IndexKind::Auxiliary)?;
        let b_values = b.values();
        debug!(
            "Computing reference tensor i{:?}, a{:?}, b{:?}: {} integrals",
            i.dims(),
            a.dims(),
            b.dims(),
            i.len() * a.len() * b_values.len()
        );
        Ok(Self { i, a, b, b_values })
    }

    fn positions(&self) -> Vec<(Vec<usize>, Vec<usize>)> {
        iproduct!(self.i.positions(), self.a.positions()).collect()
    }

    /// The entry at the given position. Positions outside the index ranges are zero.
    fn entry(
        &self,
        monomial: &Monomial,
        evaluator: &impl QuadratureEvaluator,
        i: &[usize],
        a: &[usize],
    ) -> Result<f64, FormError> {
        if !self.i.contains(i) || !self.a.contains(a) {
            return Ok(0.0);
        }
        let mut integral = 0.0;
        for b in &self.b_values {
            integral += evaluator.integrate(&monomial.basis_functions, i, a, b)?;
        }
        Ok(monomial.constant * integral)
    }

    fn into_tensor(self, monomial: &Monomial, data: Vec<f64>) -> Result<ReferenceTensor, FormError> {
        let shape = self.i.dims().iter().chain(self.a.dims()).copied().collect();
        Ok(ReferenceTensor {
            i: self.i,
            a: self.a,
            b: self.b,
            constant: monomial.constant,
            basis_functions: monomial.basis_functions.clone(),
            integral: monomial.integral,
            a0: DenseTensor::from_data(shape, data)?,
        })
    }
}

impl ReferenceTensor {
    /// Computes the reference tensor of the monomial.
    ///
    /// Axes span the full dimension of the slot of each index. Entries at values outside the
    /// range of a primary or secondary index are zero, and auxiliary indices are summed over
    /// their ranges only.
    pub fn compute(monomial: &Monomial, evaluator: &impl QuadratureEvaluator) -> Result<Self, FormError> {
        let layout = Layout::new(monomial)?;
        let data = layout
            .positions()
            .iter()
            .map(|(i, a)| layout.entry(monomial, evaluator, i, a))
            .collect::<Result<Vec<_>, _>>()?;
        layout.into_tensor(monomial, data)
    }

    /// Computes the reference tensor of the monomial, evaluating entries in parallel.
    ///
    /// The result is identical to [`ReferenceTensor::compute`].
    pub fn compute_par(monomial: &Monomial, evaluator: &impl QuadratureEvaluator) -> Result<Self, FormError> {
        let layout = Layout::new(monomial)?;
        let data = layout
            .positions()
            .par_iter()
            .map(|(i, a)| layout.entry(monomial, evaluator, i, a))
            .collect::<Result<Vec<_>, _>>()?;
        layout.into_tensor(monomial, data)
    }

    pub fn shape(&self) -> &[usize] {
        self.a0.shape()
    }

    /// The entry `A0[i, a]`.
    pub fn get(&self, i: &[usize], a: &[usize]) -> Option<f64> {
        let index: Vec<usize> = i.iter().chain(a).copied().collect();
        self.a0.get(&index)
    }
}
