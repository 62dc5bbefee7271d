//! Compilation of a form into its tensor representation.
use crate::error::FormError;
use crate::form::{DomainType, Form, Integral, Monomial};
use crate::integrate::{QuadratureDomain, ReferenceIntegrator};
use crate::reassign::mark_auxiliary_indices;
use crate::reference_tensor::ReferenceTensor;
use crate::reorder::reorder_indices;
use crate::simplify::simplify;
use eyre::WrapErr;
use itertools::iproduct;
use log::info;
use serde::{Deserialize, Serialize};

/// Settings for [`compile_form`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// The quadrature degree used for reference tensors. If `None`, each reference tensor is
    /// integrated with the sum of the degrees of its elements.
    pub quadrature_degree: Option<usize>,
    /// Whether to evaluate the entries of reference tensors in parallel.
    pub parallel: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            quadrature_degree: None,
            parallel: true,
        }
    }
}

/// A monomial of the simplified form and the reference tensor it is computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorTerm {
    /// Position of the monomial in the simplified form.
    pub monomial: usize,
    /// Position of the monomial whose reference tensor is shared. Equal to `monomial` for
    /// representatives.
    pub representative: usize,
    /// Factor relating the reference tensor of this monomial to that of its representative.
    pub scale: f64,
}

/// The reference tensors of all representatives of an integral on one domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainTensors {
    pub domain: QuadratureDomain,
    /// Pairs of representative position and reference tensor.
    pub tensors: Vec<(usize, ReferenceTensor)>,
}

impl DomainTensors {
    pub fn tensor_for(&self, representative: usize) -> Option<&ReferenceTensor> {
        self.tensors
            .iter()
            .find(|(position, _)| *position == representative)
            .map(|(_, tensor)| tensor)
    }
}

/// All terms of one integral.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegralTensors {
    pub integral: Integral,
    pub terms: Vec<TensorTerm>,
    pub domains: Vec<DomainTensors>,
}

/// The simplified, factored form and its precomputed reference tensors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorRepresentation {
    pub form: Form,
    pub factorization: Vec<Option<usize>>,
    pub integrals: Vec<IntegralTensors>,
}

/// The domains an integral is evaluated on: the cell, every facet, or every ordered pair of
/// facets.
pub fn quadrature_domains(integral: &Integral) -> Vec<QuadratureDomain> {
    match integral.domain {
        DomainType::Cell => vec![QuadratureDomain::Cell],
        DomainType::ExteriorFacet => (0..integral.num_facets)
            .map(QuadratureDomain::ExteriorFacet)
            .collect(),
        DomainType::InteriorFacet => iproduct!(0..integral.num_facets, 0..integral.num_facets)
            .map(|(plus, minus)| QuadratureDomain::InteriorFacet(plus, minus))
            .collect(),
    }
}

fn check_facet_count(monomial: &Monomial) -> Result<(), FormError> {
    let integral = monomial.integral;
    if integral.domain == DomainType::Cell {
        return Ok(());
    }
    for v in &monomial.basis_functions {
        let cell = v.element.cell();
        if cell.num_facets() != integral.num_facets {
            return Err(FormError::Unhandled(format!(
                "{} integral over {} facets of a {cell} cell, which has {} facets",
                integral,
                integral.num_facets,
                cell.num_facets()
            )));
        }
    }
    Ok(())
}

fn compute_integral_tensors(
    form: &Form,
    factorization: &[Option<usize>],
    integral: Integral,
    settings: &CompilerSettings,
) -> Result<IntegralTensors, FormError> {
    let monomials = form.monomials();
    let mut terms = Vec::new();
    let mut representatives = Vec::new();
    for (position, monomial) in monomials.iter().enumerate() {
        if monomial.integral != integral {
            continue;
        }
        check_facet_count(monomial)?;
        let representative = factorization[position].unwrap_or(position);
        if representative == position {
            representatives.push(position);
        }
        terms.push(TensorTerm {
            monomial: position,
            representative,
            scale: monomial.constant / monomials[representative].constant,
        });
    }

    let mut domains = Vec::new();
    for domain in quadrature_domains(&integral) {
        let mut tensors = Vec::with_capacity(representatives.len());
        for &position in &representatives {
            let monomial = &monomials[position];
            let integrator = ReferenceIntegrator::for_basis_functions(
                &monomial.basis_functions,
                domain,
                settings.quadrature_degree,
            )?;
            let tensor = if settings.parallel {
                ReferenceTensor::compute_par(monomial, &integrator)?
            } else {
                ReferenceTensor::compute(monomial, &integrator)?
            };
            tensors.push((position, tensor));
        }
        domains.push(DomainTensors { domain, tensors });
    }

    Ok(IntegralTensors {
        integral,
        terms,
        domains,
    })
}

/// Compiles a form into its tensor representation.
///
/// The form is simplified, secondary indices summed within basis functions are made
/// auxiliary, monomials sharing a reference tensor are identified, and one reference tensor is
/// computed per representative and integration domain.
pub fn compile_form(form: &Form, settings: &CompilerSettings) -> eyre::Result<TensorRepresentation> {
    info!("Compiling form with {} monomials", form.len());

    let mut form = form.clone();
    simplify(&mut form).wrap_err("failed to simplify form")?;
    mark_auxiliary_indices(&mut form).wrap_err("failed to mark auxiliary indices")?;
    let factorization = reorder_indices(&mut form).wrap_err("failed to factorize form")?;
    info!(
        "Simplified form has {} monomials, {} of which share a reference tensor",
        form.len(),
        factorization.iter().filter(|f| f.is_some()).count()
    );

    let integrals = form
        .integrals()
        .into_iter()
        .map(|integral| {
            compute_integral_tensors(&form, &factorization, integral, settings)
                .wrap_err_with(|| format!("failed to compute reference tensors for {integral} integral"))
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    Ok(TensorRepresentation {
        form,
        factorization,
        integrals,
    })
}
