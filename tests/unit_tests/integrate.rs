use crate::{lagrange, p1_triangle};
use fenris_form::element::ReferenceCell;
use fenris_form::form::{BasisFunction, Derivative, Restriction};
use fenris_form::index::Index;
use fenris_form::integrate::{default_quadrature_degree, QuadratureDomain, QuadratureEvaluator, ReferenceIntegrator};
use fenris_form::FormError;
use matrixcompare::assert_scalar_eq;

#[test]
fn p1_mass_matrix_entries() {
    let element = p1_triangle();
    let basis_functions = vec![BasisFunction::argument(&element, 0), BasisFunction::argument(&element, 1)];
    assert_eq!(default_quadrature_degree(&basis_functions), 2);

    let integrator = ReferenceIntegrator::for_basis_functions(&basis_functions, QuadratureDomain::Cell, None).unwrap();
    assert_eq!(integrator.cell(), ReferenceCell::Triangle);
    for i in 0..3 {
        for j in 0..3 {
            let expected = if i == j { 1.0 / 12.0 } else { 1.0 / 24.0 };
            let integral = integrator.integrate(&basis_functions, &[i, j], &[], &[]).unwrap();
            assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-14);
        }
    }
}

#[test]
fn fixed_and_summed_indices_are_resolved() {
    let element = p1_triangle();
    let mut v = BasisFunction::argument(&element, 0);
    v.derivatives.push(Derivative {
        element: element.clone(),
        index: Index::secondary(0, 0..2),
    });
    let mut w = BasisFunction::new(&element, Index::fixed(0));
    w.derivatives.push(Derivative {
        element: element.clone(),
        index: Index::auxiliary(0, 0..2),
    });
    let basis_functions = vec![v, w];
    let integrator = ReferenceIntegrator::new(ReferenceCell::Triangle, QuadratureDomain::Cell, 0).unwrap();

    // Gradients of P1 functions are constant, so the integral is half their product
    let xi = [0.25, 0.25];
    for i in 0..3 {
        for a in 0..2 {
            for b in 0..2 {
                let expected = 0.5 * element.evaluate(i, &[], &[a], &xi) * element.evaluate(0, &[], &[b], &xi);
                let integral = integrator.integrate(&basis_functions, &[i], &[a], &[b]).unwrap();
                assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-14);
            }
        }
    }

    // Missing value for the auxiliary index
    let result = integrator.integrate(&basis_functions, &[0], &[0], &[]);
    assert!(matches!(result, Err(FormError::ReferenceTensor(_))));
    // Out of bounds derivative direction
    let result = integrator.integrate(&basis_functions, &[0], &[2], &[0]);
    assert!(matches!(result, Err(FormError::ReferenceTensor(_))));
}

#[test]
fn exterior_facet_integrals() {
    let element = p1_triangle();
    let basis_functions = vec![BasisFunction::argument(&element, 0)];
    let integrator =
        ReferenceIntegrator::for_basis_functions(&basis_functions, QuadratureDomain::ExteriorFacet(2), None).unwrap();
    let nodes = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0]];

    // Facet 2 is the edge y = 0, on which the basis functions of its two vertices are linear
    for i in 0..3 {
        let node = nodes
            .iter()
            .find(|node| element.evaluate(i, &[], &[], &node[..]) > 0.5)
            .unwrap();
        let expected = if node[1] == 0.0 { 0.5 } else { 0.0 };
        let integral = integrator.integrate(&basis_functions, &[i], &[], &[]).unwrap();
        assert_scalar_eq!(integral, expected, comp = abs, tol = 1e-14);
    }
}

#[test]
fn interior_facet_evaluates_minus_side_on_minus_facet() {
    let element = p1_triangle();
    let origin = (0..3)
        .find(|&i| element.evaluate(i, &[], &[], &[0.0, 0.0]) > 0.5)
        .unwrap();
    let basis_functions = vec![
        BasisFunction::argument(&element, 0).restricted(Restriction::Plus),
        BasisFunction::argument(&element, 1).restricted(Restriction::Minus),
    ];
    // Plus side: facet 2 (y = 0), minus side: facet 1 (x = 0). Both are parametrized from the
    // origin, so the product of the two basis functions at the origin is (1 - t)^2
    let domain = QuadratureDomain::InteriorFacet(2, 1);
    let integrator = ReferenceIntegrator::new(ReferenceCell::Triangle, domain, 2).unwrap();
    let integral = integrator
        .integrate(&basis_functions, &[origin, origin], &[], &[])
        .unwrap();
    assert_scalar_eq!(integral, 1.0 / 3.0, comp = abs, tol = 1e-14);
}

#[test]
fn mismatched_cells_are_unhandled() {
    let triangle = p1_triangle();
    let interval = lagrange(ReferenceCell::Interval, 1);
    let basis_functions = vec![BasisFunction::argument(&interval, 0)];
    let integrator = ReferenceIntegrator::new(triangle.cell(), QuadratureDomain::Cell, 1).unwrap();
    let result = integrator.integrate(&basis_functions, &[0], &[], &[]);
    assert!(matches!(result, Err(FormError::Unhandled(_))));
}

#[test]
fn integrator_requires_basis_functions() {
    let result = ReferenceIntegrator::for_basis_functions(&[], QuadratureDomain::Cell, None);
    assert!(matches!(result, Err(FormError::Unhandled(_))));
}
