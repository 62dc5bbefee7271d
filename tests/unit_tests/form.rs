use crate::{arguments, p1_triangle};
use fenris_form::algebra::Expr;
use fenris_form::form::{
    BasisFunction, Coefficient, Derivative, Determinant, Form, Integral, Monomial, Restriction, Transform,
    TransformKind,
};
use fenris_form::index::{Index, IndexGenerator, IndexKind};
use fenris_form::FormError;

#[test]
fn monomial_indices_follow_canonical_order() {
    let element = p1_triangle();
    let a0 = Index::secondary(0, 0..2);
    let mut v = BasisFunction::argument(&element, 0).with_component(1);
    v.derivatives.push(Derivative {
        element: element.clone(),
        index: a0.clone(),
    });

    let mut monomial = Monomial::new(Integral::cell());
    monomial.basis_functions.push(v);
    monomial
        .transforms
        .push(Transform::new(TransformKind::JInv, a0.clone(), Index::fixed(0), Restriction::Unrestricted));
    monomial.coefficients.push(Coefficient {
        n0: 0,
        n1: 1,
        index: Index::auxiliary(0, 0..3),
    });

    let indices: Vec<Index> = monomial.indices().into_iter().cloned().collect();
    assert_eq!(
        indices,
        vec![
            Index::primary(0, 0..3),
            Index::fixed(1),
            a0.clone(),
            a0,
            Index::fixed(0),
            Index::auxiliary(0, 0..3)
        ]
    );
    assert_eq!(monomial.num_basis_function_indices(), 3);
    assert_eq!(monomial.max_index(IndexKind::Secondary), Some(0));
    assert_eq!(monomial.max_index(IndexKind::Primary), Some(0));
    assert_eq!(monomial.max_index(IndexKind::Auxiliary), Some(0));
    assert!(monomial.check_index_balance().is_ok());
}

#[test]
fn index_occurring_three_times_violates_balance() {
    let element = p1_triangle();
    let a0 = Index::secondary(0, 0..3);
    let mut monomial = Monomial::new(Integral::cell());
    for _ in 0..3 {
        monomial
            .basis_functions
            .push(BasisFunction::new(&element, a0.clone()));
    }
    let result = monomial.check_index_balance();
    assert!(matches!(result, Err(FormError::InvariantViolation { .. })));

    let form = Form::new(vec![monomial]);
    match form.check_index_balance() {
        Err(FormError::InvariantViolation { context, .. }) => {
            assert_eq!(context.len(), 2);
            assert!(context[1].contains("monomial 0"));
        }
        other => panic!("expected invariant violation, got {other:?}"),
    }
}

#[test]
fn index_with_inconsistent_ranges_violates_balance() {
    let element = p1_triangle();
    let mut monomial = Monomial::new(Integral::cell());
    monomial
        .basis_functions
        .push(BasisFunction::new(&element, Index::secondary(0, 0..3)));
    monomial
        .basis_functions
        .push(BasisFunction::new(&element, Index::secondary(0, 0..2)));
    assert!(matches!(
        monomial.check_index_balance(),
        Err(FormError::InvariantViolation { .. })
    ));
}

#[test]
fn determinants_with_compatible_restrictions_multiply() {
    let plus = Determinant::new(1, Restriction::Plus);
    let minus = Determinant::new(-1, Restriction::Minus);
    let constant = Determinant::new(2, Restriction::Constant);

    assert_eq!(plus.multiply(&plus), Some(Determinant::new(2, Restriction::Plus)));
    assert_eq!(plus.multiply(&minus), None);
    assert_eq!(constant.multiply(&minus), Some(Determinant::new(1, Restriction::Minus)));
    assert_eq!(plus.multiply(&constant), Some(Determinant::new(3, Restriction::Plus)));
}

#[test]
fn form_rank_and_integrals() {
    let element = p1_triangle();
    let (u, v) = arguments(&element);
    let mut generator = IndexGenerator::new();
    let cell = (u.clone() * v.clone()).unwrap().integrate(Integral::cell()).unwrap();
    let facet = u
        .dx(0, &mut generator)
        .unwrap()
        .integrate(Integral::exterior_facet(3))
        .unwrap();
    let form = match (Expr::from(cell) + Expr::from(facet)).unwrap() {
        Expr::Form(form) => form,
        other => panic!("expected form, got {other:?}"),
    };

    assert_eq!(form.len(), 2);
    assert_eq!(form.rank(), 2);
    assert_eq!(
        form.integrals(),
        vec![Integral::cell(), Integral::exterior_facet(3)]
    );
    assert!(Form::default().is_empty());
    assert_eq!(Form::default().rank(), 0);
    assert_eq!(Form::default().to_string(), "0");
}

#[test]
fn monomial_display() {
    let element = p1_triangle();
    let (u, v) = arguments(&element);
    let mut generator = IndexGenerator::new();
    let form = (2.0 * (u.dx(0, &mut generator).unwrap() * v).unwrap())
        .unwrap()
        .integrate(Integral::cell())
        .unwrap();
    assert_eq!(
        form.monomials()[0].to_string(),
        "2 * (dX_a0/dx_0) * (d/dX_a0)v[E0]_i0 * v[E0]_i1 * dx"
    );
}
