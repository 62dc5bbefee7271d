use crate::element::Element;
use crate::form::{
    BasisFunction, Derivative, Determinant, Form, Integral, Monomial, Restriction, Transform, TransformKind,
};
use crate::index::Index;
use ::proptest::prelude::*;

fn gradient_product(element: &Element, constant: f64, du: usize, dv: usize, determinant: Option<i32>) -> Monomial {
    let shape_dim = element.shape_dimension();
    let differentiated = |id: usize, direction: usize| {
        let a = Index::secondary(id, 0..shape_dim);
        let mut v = BasisFunction::argument(element, id);
        v.derivatives.push(Derivative {
            element: element.clone(),
            index: a.clone(),
        });
        let transform = Transform::new(TransformKind::JInv, a, Index::fixed(direction), Restriction::Unrestricted);
        (v, transform)
    };
    let (u, tu) = differentiated(0, du);
    let (v, tv) = differentiated(1, dv);

    let mut monomial = Monomial::new(Integral::cell());
    monomial.constant = constant;
    monomial.basis_functions = vec![u, v];
    monomial.transforms = vec![tu, tv];
    monomial.determinants = determinant
        .map(|power| Determinant::new(power, Restriction::Unrestricted))
        .into_iter()
        .collect();
    monomial
}

/// Forms that are sums of terms `c * (du/dx_i) * (dv/dx_j)` with the physical directions `i`
/// and `j` and the constants `c` drawn at random.
///
/// The element must have a shape dimension of at least one.
pub fn gradient_product_form(element: Element, max_terms: usize) -> impl Strategy<Value = Form> {
    let shape_dim = element.shape_dimension().max(1);
    let constant = prop_oneof![Just(-2.0), Just(-1.0), Just(0.5), Just(1.0), Just(2.0)];
    let term = (constant, 0..shape_dim, 0..shape_dim, ::proptest::option::of(-1..=1));
    ::proptest::collection::vec(term, 0..=max_terms).prop_map(move |terms| {
        Form::new(
            terms
                .into_iter()
                .map(|(c, du, dv, det)| gradient_product(&element, c, du, dv, det))
                .collect(),
        )
    })
}
