use crate::lagrange;
use fenris_form::element::{ElementId, ElementRegistry, FiniteElement, LagrangeElement, ReferenceCell};
use fenris_form::FormError;
use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;

const CELLS: [ReferenceCell; 5] = [
    ReferenceCell::Interval,
    ReferenceCell::Triangle,
    ReferenceCell::Tetrahedron,
    ReferenceCell::Quadrilateral,
    ReferenceCell::Hexahedron,
];

/// Points in the unit cube (or square, or interval) that also lie in the unit simplex.
fn point_in_simplex(dim: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(0.0..=1.0, dim).prop_map(|mut xi: Vec<f64>| {
        let sum: f64 = xi.iter().sum();
        if sum > 1.0 {
            xi.iter_mut().for_each(|x| *x /= sum);
        }
        xi
    })
}

#[test]
fn registry_interns_elements_by_signature() {
    let mut registry = ElementRegistry::new();
    let p1 = registry.register(LagrangeElement::new(ReferenceCell::Triangle, 1).unwrap());
    let p2 = registry.register(LagrangeElement::new(ReferenceCell::Triangle, 2).unwrap());
    let p1_again = registry.register(LagrangeElement::new(ReferenceCell::Triangle, 1).unwrap());

    assert_eq!(p1.id(), ElementId(0));
    assert_eq!(p2.id(), ElementId(1));
    assert_eq!(p1, p1_again);
    assert_ne!(p1, p2);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(ElementId(1)), Some(&p2));
    assert_eq!(registry.get(ElementId(2)), None);
}

#[test]
fn lagrange_dimensions() {
    let expected = [
        (ReferenceCell::Interval, 1, 2),
        (ReferenceCell::Interval, 3, 4),
        (ReferenceCell::Triangle, 1, 3),
        (ReferenceCell::Triangle, 2, 6),
        (ReferenceCell::Tetrahedron, 1, 4),
        (ReferenceCell::Tetrahedron, 2, 10),
        (ReferenceCell::Quadrilateral, 1, 4),
        (ReferenceCell::Quadrilateral, 2, 9),
        (ReferenceCell::Hexahedron, 1, 8),
        (ReferenceCell::Triangle, 0, 1),
    ];
    for (cell, degree, space_dim) in expected {
        let element = LagrangeElement::new(cell, degree).unwrap();
        assert_eq!(element.space_dimension(), space_dim, "{cell}, degree {degree}");
        assert_eq!(element.shape_dimension(), cell.dimension());
        assert!(element.value_shape().is_empty());
    }
}

#[test]
fn lagrange_basis_is_nodal() {
    for cell in CELLS {
        for degree in 0..=2 {
            let element = LagrangeElement::new(cell, degree).unwrap();
            for (i, _) in element.nodes().iter().enumerate() {
                for (j, node) in element.nodes().iter().enumerate() {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    let value = element.evaluate(i, &[], &[], node);
                    assert_scalar_eq!(value, expected, comp = abs, tol = 1e-12);
                }
            }
        }
    }
}

#[test]
fn p1_triangle_gradients_are_constant() {
    let element = LagrangeElement::new(ReferenceCell::Triangle, 1).unwrap();
    // The basis function at the origin is 1 - x - y
    let origin = element
        .nodes()
        .iter()
        .position(|node| node == &vec![0.0, 0.0])
        .unwrap();
    for xi in [[0.1, 0.2], [0.5, 0.25], [0.0, 1.0]] {
        assert_scalar_eq!(element.evaluate(origin, &[], &[0], &xi), -1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(element.evaluate(origin, &[], &[1], &xi), -1.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(element.evaluate(origin, &[], &[0, 1], &xi), 0.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn vector_lagrange_stacks_scalar_basis() {
    let scalar = LagrangeElement::new(ReferenceCell::Triangle, 1).unwrap();
    let vector = LagrangeElement::vector(ReferenceCell::Triangle, 1, 2).unwrap();
    assert_eq!(vector.space_dimension(), 6);
    assert_eq!(vector.value_shape(), &[2]);
    assert_ne!(vector.signature(), scalar.signature());

    let xi = [0.2, 0.3];
    for k in 0..6 {
        let block = k / 3;
        for component in 0..2 {
            let expected = if component == block {
                scalar.evaluate(k % 3, &[], &[1], &xi)
            } else {
                0.0
            };
            assert_eq!(vector.evaluate(k, &[component], &[1], &xi), expected);
        }
    }
}

#[test]
fn lagrange_on_vertex_is_unhandled() {
    let result = LagrangeElement::new(ReferenceCell::Vertex, 1);
    assert!(matches!(result, Err(FormError::Unhandled(_))));
}

#[test]
fn reference_cell_facets() {
    assert_eq!(ReferenceCell::Interval.num_facets(), 2);
    assert_eq!(ReferenceCell::Triangle.num_facets(), 3);
    assert_eq!(ReferenceCell::Tetrahedron.num_facets(), 4);
    assert_eq!(ReferenceCell::Quadrilateral.num_facets(), 4);
    assert_eq!(ReferenceCell::Hexahedron.num_facets(), 6);
    assert_eq!(ReferenceCell::Vertex.num_facets(), 0);

    assert_eq!(ReferenceCell::Triangle.facet_vertices(0), Some(&[1, 2][..]));
    assert_eq!(ReferenceCell::Tetrahedron.facet_vertices(3), Some(&[0, 1, 2][..]));
    assert_eq!(ReferenceCell::Triangle.facet_vertices(3), None);
    assert_eq!(ReferenceCell::Tetrahedron.facet_cell(), Some(ReferenceCell::Triangle));
    assert_eq!(ReferenceCell::Vertex.facet_cell(), None);
}

#[test]
fn facet_maps_land_on_facets() {
    // Facet 0 of the triangle is the hypotenuse
    let (origin, map) = ReferenceCell::Triangle.facet_map(0).unwrap();
    let x = &origin + &map * nalgebra::DVector::from_column_slice(&[0.25]);
    assert_scalar_eq!(x[0], 0.75, comp = abs, tol = 1e-15);
    assert_scalar_eq!(x[1], 0.25, comp = abs, tol = 1e-15);

    // Facet 5 of the hexahedron is the top face z = 1
    let (origin, map) = ReferenceCell::Hexahedron.facet_map(5).unwrap();
    let x = &origin + &map * nalgebra::DVector::from_column_slice(&[0.5, 0.25]);
    assert_eq!(x.as_slice(), &[0.5, 0.25, 1.0]);

    assert!(matches!(
        ReferenceCell::Quadrilateral.facet_map(4),
        Err(FormError::Unhandled(_))
    ));
}

#[test]
fn reference_cell_midpoint() {
    let midpoint = ReferenceCell::Triangle.midpoint();
    assert_scalar_eq!(midpoint[0], 1.0 / 3.0, comp = abs, tol = 1e-15);
    assert_scalar_eq!(midpoint[1], 1.0 / 3.0, comp = abs, tol = 1e-15);
    assert_eq!(ReferenceCell::Hexahedron.midpoint(), vec![0.5, 0.5, 0.5]);
}

#[test]
fn element_handles_delegate_to_element() {
    let element = lagrange(ReferenceCell::Quadrilateral, 2);
    assert_eq!(element.cell(), ReferenceCell::Quadrilateral);
    assert_eq!(element.degree(), 2);
    assert_eq!(element.space_dimension(), 9);
    assert_eq!(element.shape_dimension(), 2);
}

proptest! {
    #[test]
    fn lagrange_basis_is_partition_of_unity(
        cell_index in 0..5usize,
        degree in 0..=3usize,
        seed in point_in_simplex(3)
    ) {
        let cell = CELLS[cell_index];
        let element = LagrangeElement::new(cell, degree).unwrap();
        let xi = &seed[..cell.dimension()];

        let sum: f64 = (0..element.space_dimension())
            .map(|i| element.evaluate(i, &[], &[], xi))
            .sum();
        assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-10);

        for direction in 0..cell.dimension() {
            let gradient_sum: f64 = (0..element.space_dimension())
                .map(|i| element.evaluate(i, &[], &[direction], xi))
                .sum();
            assert_scalar_eq!(gradient_sum, 0.0, comp = abs, tol = 1e-9);
        }
    }
}
