use crate::{arguments, p1_triangle};
use fenris_form::element::Element;
use fenris_form::form::{BasisFunction, Derivative, Integral, Monomial};
use fenris_form::index::{Index, IndexGenerator};
use fenris_form::signature::{compute_hard_signature, compute_soft_signature};

fn with_derivatives(element: &Element, derivatives: [usize; 2]) -> Monomial {
    let mut monomial = Monomial::new(Integral::cell());
    monomial.basis_functions = derivatives
        .iter()
        .enumerate()
        .map(|(id, &a)| {
            let mut v = BasisFunction::argument(element, id);
            v.derivatives.push(Derivative {
                element: element.clone(),
                index: Index::secondary(a, 0..2),
            });
            v
        })
        .collect();
    monomial
}

#[test]
fn signatures_do_not_depend_on_basis_function_order() {
    let (u, v) = arguments(&p1_triangle());
    let uv = (u.clone() * v.clone()).unwrap().integrate(Integral::cell()).unwrap();
    let vu = (v * u).unwrap().integrate(Integral::cell()).unwrap();
    let (uv, vu) = (&uv.monomials()[0], &vu.monomials()[0]);
    assert_ne!(uv, vu);
    assert_eq!(compute_hard_signature(uv), compute_hard_signature(vu));
    assert_eq!(compute_soft_signature(uv), compute_soft_signature(vu));
}

#[test]
fn signatures_ignore_geometry() {
    let (u, v) = arguments(&p1_triangle());
    let monomial = |direction: usize, constant: f64| {
        let mut generator = IndexGenerator::new();
        let du = u.dx(direction, &mut generator).unwrap();
        let form = (constant * (du * v.clone()).unwrap())
            .unwrap()
            .integrate(Integral::cell())
            .unwrap();
        form.monomials()[0].clone()
    };
    let (m, n) = (monomial(0, 1.0), monomial(1, -3.0));
    assert_ne!(m.transforms, n.transforms);
    assert_eq!(compute_hard_signature(&m), compute_hard_signature(&n));
}

#[test]
fn soft_signatures_ignore_secondary_numbering() {
    let element = p1_triangle();
    let m = with_derivatives(&element, [0, 1]);
    let n = with_derivatives(&element, [1, 0]);
    assert_ne!(compute_hard_signature(&m), compute_hard_signature(&n));
    assert_eq!(compute_soft_signature(&m), compute_soft_signature(&n));
    assert_eq!(compute_soft_signature(&m).basis_functions[0].derivatives[0].value, None);
}

#[test]
fn signatures_distinguish_integrals() {
    let element = p1_triangle();
    let m = with_derivatives(&element, [0, 1]);
    let mut n = m.clone();
    n.integral = Integral::exterior_facet(3);
    assert_ne!(compute_soft_signature(&m), compute_soft_signature(&n));
}
