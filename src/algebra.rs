//! Construction of forms from basis functions by differentiation, multiplication and addition.
//!
//! All expressions are values of the closed enum [`Expr`]. Combining two expressions yields the
//! most specific variant that can represent the result, or a [`FormError::TermAlgebra`] if the
//! combination is meaningless for a multilinear form.
use crate::error::FormError;
use crate::form::{
    BasisFunction, Coefficient, Derivative, Determinant, Form, Integral, Monomial, Transform, TransformKind,
};
use crate::index::{Index, IndexGenerator};
use std::ops::{Add, Mul, Neg, Sub};

/// A (possibly) differentiated basis function together with the transforms its physical
/// derivatives introduced.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub basis_function: BasisFunction,
    pub transforms: Vec<Transform>,
}

impl From<BasisFunction> for Factor {
    fn from(basis_function: BasisFunction) -> Self {
        Self {
            basis_function,
            transforms: Vec::new(),
        }
    }
}

impl Factor {
    fn dx(mut self, direction: Index, generator: &mut IndexGenerator) -> Self {
        let element = self.basis_function.element.clone();
        let index = generator.secondary(0..element.shape_dimension());
        let restriction = self.basis_function.restriction;
        self.basis_function.derivatives.push(Derivative {
            element,
            index: index.clone(),
        });
        self.transforms
            .push(Transform::new(TransformKind::JInv, index, direction, restriction));
        self
    }

    fn reference_dx(mut self, direction: Index) -> Self {
        let element = self.basis_function.element.clone();
        self.basis_function.derivatives.push(Derivative {
            element,
            index: direction,
        });
        self
    }
}

/// A monomial that has not been integrated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub constant: f64,
    pub basis_functions: Vec<BasisFunction>,
    pub transforms: Vec<Transform>,
    pub coefficients: Vec<Coefficient>,
    pub determinants: Vec<Determinant>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            constant: 1.0,
            basis_functions: Vec::new(),
            transforms: Vec::new(),
            coefficients: Vec::new(),
            determinants: Vec::new(),
        }
    }
}

impl From<Factor> for Product {
    fn from(factor: Factor) -> Self {
        Self {
            basis_functions: vec![factor.basis_function],
            transforms: factor.transforms,
            ..Self::default()
        }
    }
}

impl From<BasisFunction> for Product {
    fn from(basis_function: BasisFunction) -> Self {
        Factor::from(basis_function).into()
    }
}

impl Product {
    pub fn with_coefficient(mut self, coefficient: Coefficient) -> Self {
        self.coefficients.push(coefficient);
        self
    }

    pub fn with_determinant(mut self, determinant: Determinant) -> Self {
        self.determinants.push(determinant);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    fn scaled(mut self, factor: f64) -> Self {
        self.constant *= factor;
        self
    }

    fn times(mut self, other: Product) -> Self {
        self.constant *= other.constant;
        self.basis_functions.extend(other.basis_functions);
        self.transforms.extend(other.transforms);
        self.coefficients.extend(other.coefficients);
        self.determinants.extend(other.determinants);
        self
    }

    /// Applies the product rule: one term per basis function, differentiated in turn.
    fn differentiate(&self, mut differentiate_factor: impl FnMut(Factor) -> Factor) -> Sum {
        let products = (0..self.basis_functions.len())
            .map(|k| {
                let mut product = self.clone();
                let factor = differentiate_factor(Factor::from(product.basis_functions[k].clone()));
                product.basis_functions[k] = factor.basis_function;
                product.transforms.extend(factor.transforms);
                product
            })
            .collect();
        Sum { products }
    }

    pub fn integrate(self, integral: Integral) -> Monomial {
        Monomial {
            constant: self.constant,
            basis_functions: self.basis_functions,
            transforms: self.transforms,
            coefficients: self.coefficients,
            determinants: self.determinants,
            integral,
        }
    }
}

/// A sum of products that has not been integrated yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sum {
    pub products: Vec<Product>,
}

impl Sum {
    fn scaled(self, factor: f64) -> Self {
        Sum {
            products: self.products.into_iter().map(|p| p.scaled(factor)).collect(),
        }
    }
}

/// An expression of the form language.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Scalar(f64),
    Basis(BasisFunction),
    Factor(Factor),
    Product(Product),
    Sum(Sum),
    Form(Form),
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<BasisFunction> for Expr {
    fn from(basis_function: BasisFunction) -> Self {
        Self::Basis(basis_function)
    }
}

impl From<Factor> for Expr {
    fn from(factor: Factor) -> Self {
        Self::Factor(factor)
    }
}

impl From<Product> for Expr {
    fn from(product: Product) -> Self {
        Self::Product(product)
    }
}

impl From<Sum> for Expr {
    fn from(sum: Sum) -> Self {
        Self::Sum(sum)
    }
}

impl From<Form> for Expr {
    fn from(form: Form) -> Self {
        Self::Form(form)
    }
}

impl Expr {
    fn variant_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Basis(_) => "basis function",
            Self::Factor(_) => "factor",
            Self::Product(_) => "product",
            Self::Sum(_) => "sum",
            Self::Form(_) => "form",
        }
    }

    /// Converts an expression that is linear in its basis functions to a product.
    fn into_product(self) -> Option<Product> {
        match self {
            Self::Basis(v) => Some(v.into()),
            Self::Factor(f) => Some(f.into()),
            Self::Product(p) => Some(p),
            _ => None,
        }
    }

    fn into_sum(self) -> Option<Sum> {
        match self {
            Self::Sum(sum) => Some(sum),
            other => other.into_product().map(|p| Sum { products: vec![p] }),
        }
    }

    fn scaled(self, factor: f64) -> Result<Expr, FormError> {
        match self {
            Self::Scalar(value) => Ok(Self::Scalar(value * factor)),
            Self::Sum(sum) => Ok(Self::Sum(sum.scaled(factor))),
            Self::Form(form) => Err(FormError::TermAlgebra(format!(
                "cannot multiply form ({form}) with scalar {factor}"
            ))),
            other => Ok(Self::Product(
                other
                    .into_product()
                    .map(|p| p.scaled(factor))
                    .unwrap_or_default(),
            )),
        }
    }

    /// Differentiates the expression with respect to the physical coordinate `direction`.
    ///
    /// Each differentiation introduces a fresh secondary index `a` ranging over the shape
    /// dimension of the element, appends a reference derivative tagged `a` to the basis function
    /// and a transform `dX_a / dx_direction`. Products are differentiated with the product rule.
    pub fn dx(&self, direction: impl Into<Index>, generator: &mut IndexGenerator) -> Result<Expr, FormError> {
        let direction = direction.into();
        self.differentiate(|factor| factor.dx(direction.clone(), generator))
    }

    /// Differentiates the expression with respect to the reference coordinate `direction`,
    /// without introducing a transform.
    pub fn reference_dx(&self, direction: impl Into<Index>) -> Result<Expr, FormError> {
        let direction = direction.into();
        self.differentiate(|factor| factor.reference_dx(direction.clone()))
    }

    fn differentiate(&self, mut differentiate_factor: impl FnMut(Factor) -> Factor) -> Result<Expr, FormError> {
        match self {
            Self::Scalar(_) => Ok(Self::Sum(Sum::default())),
            Self::Basis(v) => Ok(Self::Factor(differentiate_factor(Factor::from(v.clone())))),
            Self::Factor(f) => Ok(Self::Factor(differentiate_factor(f.clone()))),
            Self::Product(p) => Ok(Self::Sum(p.differentiate(differentiate_factor))),
            Self::Sum(sum) => {
                let mut products = Vec::new();
                for product in &sum.products {
                    products.extend(product.differentiate(&mut differentiate_factor).products);
                }
                Ok(Self::Sum(Sum { products }))
            }
            Self::Form(_) => Err(FormError::TermAlgebra("cannot differentiate an integrated form".to_string())),
        }
    }

    /// Integrates the expression against the given measure.
    pub fn integrate(self, integral: Integral) -> Result<Form, FormError> {
        match self {
            Self::Scalar(value) => Err(FormError::TermAlgebra(format!(
                "cannot integrate scalar {value}, the form has no arguments"
            ))),
            Self::Form(_) => Err(FormError::TermAlgebra("form is already integrated".to_string())),
            other => {
                let sum = other.into_sum().unwrap_or_default();
                Ok(Form::new(
                    sum.products
                        .into_iter()
                        .map(|p| p.integrate(integral))
                        .collect(),
                ))
            }
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Self::Scalar(value) => Self::Scalar(-value),
            Self::Sum(sum) => Self::Sum(sum.scaled(-1.0)),
            Self::Form(mut form) => {
                for monomial in form.monomials_mut() {
                    monomial.constant = -monomial.constant;
                }
                Self::Form(form)
            }
            other => Self::Product(other.into_product().unwrap_or_default().scaled(-1.0)),
        }
    }
}

impl Add for Expr {
    type Output = Result<Expr, FormError>;

    fn add(self, rhs: Expr) -> Self::Output {
        match (self, rhs) {
            (Self::Scalar(a), Self::Scalar(b)) => Ok(Self::Scalar(a + b)),
            (Self::Form(a), Self::Form(b)) => {
                let mut monomials = a.into_monomials();
                monomials.extend(b.into_monomials());
                Ok(Self::Form(Form::new(monomials)))
            }
            (lhs @ (Self::Scalar(_) | Self::Form(_)), rhs) | (lhs, rhs @ (Self::Scalar(_) | Self::Form(_))) => {
                Err(FormError::TermAlgebra(format!(
                    "cannot add {} with {}",
                    lhs.variant_name(),
                    rhs.variant_name()
                )))
            }
            (lhs, rhs) => {
                let mut products = lhs.into_sum().unwrap_or_default().products;
                products.extend(rhs.into_sum().unwrap_or_default().products);
                Ok(Self::Sum(Sum { products }))
            }
        }
    }
}

impl Sub for Expr {
    type Output = Result<Expr, FormError>;

    fn sub(self, rhs: Expr) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for Expr {
    type Output = Result<Expr, FormError>;

    fn mul(self, rhs: Expr) -> Self::Output {
        match (self, rhs) {
            (lhs @ Self::Form(_), rhs) | (lhs, rhs @ Self::Form(_)) => Err(FormError::TermAlgebra(format!(
                "cannot multiply {} with {}",
                lhs.variant_name(),
                rhs.variant_name()
            ))),
            (Self::Scalar(a), other) | (other, Self::Scalar(a)) => other.scaled(a),
            (Self::Sum(a), Self::Sum(b)) => {
                let products = a
                    .products
                    .iter()
                    .flat_map(|p| b.products.iter().map(move |q| p.clone().times(q.clone())))
                    .collect();
                Ok(Self::Sum(Sum { products }))
            }
            (Self::Sum(sum), other) => {
                let q = other.into_product().unwrap_or_default();
                let products = sum.products.into_iter().map(|p| p.times(q.clone())).collect();
                Ok(Self::Sum(Sum { products }))
            }
            (other, Self::Sum(sum)) => {
                let p = other.into_product().unwrap_or_default();
                let products = sum.products.into_iter().map(|q| p.clone().times(q)).collect();
                Ok(Self::Sum(Sum { products }))
            }
            (lhs, rhs) => {
                let p = lhs.into_product().unwrap_or_default();
                let q = rhs.into_product().unwrap_or_default();
                Ok(Self::Product(p.times(q)))
            }
        }
    }
}

impl Mul<Expr> for f64 {
    type Output = Result<Expr, FormError>;

    fn mul(self, rhs: Expr) -> Self::Output {
        Expr::Scalar(self) * rhs
    }
}
