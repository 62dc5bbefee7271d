//! Errors raised while building, simplifying or evaluating forms.
use std::fmt;
use std::fmt::{Display, Formatter};

/// Errors returned by form compilation.
///
/// None of these are recoverable: the form compiler performs a purely symbolic transformation,
/// so any error aborts compilation of the current form.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FormError {
    /// Two algebraic expressions were combined in a way that has no meaning for multilinear
    /// forms, e.g. adding a scalar to a form.
    TermAlgebra(String),
    /// The simplifier produced or encountered a state it must never produce.
    Simplification(String),
    /// The form violates the contract expected by the compiler (balanced summation
    /// convention, consistent signatures).
    InvariantViolation {
        message: String,
        /// Rendered monomials, signatures or indices that help diagnosing the violation.
        context: Vec<String>,
    },
    /// The shape of a reference tensor could not be determined, or an index could not be
    /// resolved while evaluating it.
    ReferenceTensor(String),
    /// A combination of cell, element and integration domain that is not supported.
    Unhandled(String),
    /// No quadrature rule is available for the requested accuracy.
    Quadrature(fenris_quadrature::Error),
}

impl FormError {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub(crate) fn with_context(self, item: impl ToString) -> Self {
        match self {
            Self::InvariantViolation { message, mut context } => {
                context.push(item.to_string());
                Self::InvariantViolation { message, context }
            }
            other => other,
        }
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TermAlgebra(message) => write!(f, "invalid form expression: {message}"),
            Self::Simplification(message) => write!(f, "simplification failed: {message}"),
            Self::InvariantViolation { message, context } => {
                write!(f, "internal invariant violated: {message}")?;
                for item in context {
                    write!(f, "\n    {item}")?;
                }
                Ok(())
            }
            Self::ReferenceTensor(message) => write!(f, "failed to compute reference tensor: {message}"),
            Self::Unhandled(message) => write!(f, "unhandled case: {message}"),
            Self::Quadrature(error) => write!(f, "quadrature error: {error}"),
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Quadrature(error) => Some(error),
            _ => None,
        }
    }
}

impl From<fenris_quadrature::Error> for FormError {
    fn from(error: fenris_quadrature::Error) -> Self {
        Self::Quadrature(error)
    }
}
