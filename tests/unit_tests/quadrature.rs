use fenris_form::element::ReferenceCell;
use fenris_form::quadrature::QuadratureRule;
use fenris_form::FormError;
use matrixcompare::assert_scalar_eq;

fn integrate(rule: &QuadratureRule, f: impl Fn(&[f64]) -> f64) -> f64 {
    rule.weights()
        .iter()
        .zip(rule.points())
        .map(|(w, x)| w * f(x.as_slice()))
        .sum()
}

#[test]
fn cell_rules_integrate_volume() {
    let expected = [
        (ReferenceCell::Vertex, 1.0),
        (ReferenceCell::Interval, 1.0),
        (ReferenceCell::Triangle, 0.5),
        (ReferenceCell::Tetrahedron, 1.0 / 6.0),
        (ReferenceCell::Quadrilateral, 1.0),
        (ReferenceCell::Hexahedron, 1.0),
    ];
    for (cell, volume) in expected {
        for degree in 0..4 {
            let rule = QuadratureRule::for_cell(cell, degree).unwrap();
            assert!(!rule.is_empty());
            assert_scalar_eq!(integrate(&rule, |_| 1.0), volume, comp = abs, tol = 1e-13);
            assert!(rule.points().iter().all(|x| x.len() == cell.dimension()));
        }
    }
}

#[test]
fn triangle_rule_is_exact_for_its_degree() {
    let rule = QuadratureRule::for_cell(ReferenceCell::Triangle, 2).unwrap();
    assert_scalar_eq!(integrate(&rule, |x| x[0] * x[0]), 1.0 / 12.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&rule, |x| x[0] * x[1]), 1.0 / 24.0, comp = abs, tol = 1e-14);
}

#[test]
fn facet_rule_points_lie_on_facet() {
    for facet in 0..3 {
        let rule = QuadratureRule::for_facet(ReferenceCell::Triangle, facet, 3).unwrap();
        assert_scalar_eq!(integrate(&rule, |_| 1.0), 1.0, comp = abs, tol = 1e-14);
        for x in rule.points() {
            let on_facet = match facet {
                0 => x[0] + x[1] - 1.0,
                1 => x[0],
                _ => x[1],
            };
            assert_scalar_eq!(on_facet, 0.0, comp = abs, tol = 1e-14);
        }
    }

    let rule = QuadratureRule::for_facet(ReferenceCell::Interval, 0, 2).unwrap();
    assert_eq!(rule.len(), 1);
    assert_eq!(rule.points()[0].as_slice(), &[1.0]);
}

#[test]
fn facet_rule_on_tetrahedron_integrates_facet_area() {
    let rule = QuadratureRule::for_facet(ReferenceCell::Tetrahedron, 3, 2).unwrap();
    assert_scalar_eq!(integrate(&rule, |_| 1.0), 0.5, comp = abs, tol = 1e-14);
    assert!(rule.points().iter().all(|x| x[2] == 0.0));
}

#[test]
fn facet_rule_on_vertex_is_unhandled() {
    let result = QuadratureRule::for_facet(ReferenceCell::Vertex, 0, 1);
    assert!(matches!(result, Err(FormError::Unhandled(_))));
}
