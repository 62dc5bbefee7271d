//! Symbolic form algebra and index contraction for finite element form compilers.
//!
//! Multilinear forms are built from basis functions with the term algebra in [`algebra`],
//! simplified by [`simplify::simplify`], factored into groups sharing a reference tensor by
//! [`reorder::reorder_indices`], and finally turned into precomputed reference tensors by
//! [`representation::compile_form`].
pub mod algebra;
pub mod element;
pub mod error;
pub mod form;
pub mod index;
pub mod integrate;
pub mod multi_index;
pub mod quadrature;
pub mod reassign;
pub mod reference_tensor;
pub mod reorder;
pub mod representation;
pub mod signature;
pub mod simplify;

#[cfg(feature = "proptest")]
pub mod proptest;

pub use error::FormError;

pub extern crate nalgebra;
