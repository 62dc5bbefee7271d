//! Finite element descriptions consumed by the form compiler.
//!
//! The form compiler never inspects the internals of an element. It needs the dimensions of
//! the element (for the shape of reference tensors) and the ability to evaluate basis
//! functions and their reference derivatives (for quadrature). Elements are interned in an
//! [`ElementRegistry`], and the symbolic data model only stores cheap [`Element`] handles
//! that compare by their [`ElementId`].
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

mod cell;
mod lagrange;

pub use cell::*;
pub use lagrange::*;

pub trait FiniteElement: Debug + Send + Sync {
    /// A string that uniquely identifies the element, used for interning.
    fn signature(&self) -> String;

    fn cell(&self) -> ReferenceCell;

    /// The polynomial degree of the element, used to select quadrature rules.
    fn degree(&self) -> usize;

    /// The number of basis functions.
    fn space_dimension(&self) -> usize;

    /// The dimension of the reference cell, i.e. the number of reference derivative directions.
    fn shape_dimension(&self) -> usize {
        self.cell().dimension()
    }

    /// The dimensions of the tensor components of each basis function. Empty for scalar
    /// elements.
    fn value_shape(&self) -> &[usize];

    /// Evaluates a reference partial derivative of a component of a basis function.
    ///
    /// `derivatives` lists one reference direction per differentiation, `component` has one
    /// entry per axis of the value shape, and `xi` are reference coordinates.
    ///
    /// The caller is responsible for passing arguments within the dimensions reported by
    /// the element.
    fn evaluate(&self, basis: usize, component: &[usize], derivatives: &[usize], xi: &[f64]) -> f64;
}

/// Identifier of an element within an [`ElementRegistry`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ElementId(pub u32);

impl Display for ElementId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A shared handle to a registered finite element.
///
/// Handles compare, order and hash by their id only.
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    data: Arc<dyn FiniteElement>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn finite_element(&self) -> &dyn FiniteElement {
        self.data.as_ref()
    }

    pub fn cell(&self) -> ReferenceCell {
        self.data.cell()
    }

    pub fn degree(&self) -> usize {
        self.data.degree()
    }

    pub fn space_dimension(&self) -> usize {
        self.data.space_dimension()
    }

    pub fn shape_dimension(&self) -> usize {
        self.data.shape_dimension()
    }

    pub fn value_shape(&self) -> &[usize] {
        self.data.value_shape()
    }

    pub fn evaluate(&self, basis: usize, component: &[usize], derivatives: &[usize], xi: &[f64]) -> f64 {
        self.data.evaluate(basis, component, derivatives, xi)
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("signature", &self.data.signature())
            .finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl PartialOrd for Element {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Element {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

/// Interns finite elements and hands out [`Element`] handles.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    elements: Vec<Element>,
    ids_by_signature: FxHashMap<String, ElementId>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an element and returns its handle.
    ///
    /// If an element with the same signature is already registered, the existing handle is
    /// returned and `element` is dropped.
    pub fn register<E: FiniteElement + 'static>(&mut self, element: E) -> Element {
        let signature = element.signature();
        if let Some(id) = self.ids_by_signature.get(&signature) {
            return self.elements[id.0 as usize].clone();
        }

        let id = ElementId(self.elements.len() as u32);
        let handle = Element {
            id,
            data: Arc::new(element),
        };
        self.ids_by_signature.insert(signature, id);
        self.elements.push(handle.clone());
        handle
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }
}
