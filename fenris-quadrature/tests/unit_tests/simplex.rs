use super::factorial;
use fenris_quadrature::integrate;
use fenris_quadrature::simplex::{unit_tetrahedron_collapsed_gauss, unit_triangle_collapsed_gauss};
use matrixcompare::assert_scalar_eq;

#[test]
fn unit_triangle_rules_integrate_total_degree_exactly() {
    for n in 1..=8 {
        let max_degree = (2 * n - 1) as i32;
        let rule = unit_triangle_collapsed_gauss(n).unwrap();

        assert!(rule.0.iter().all(|&w| w > 0.0));
        assert!(rule.1.iter().all(|&[x, y]| x >= 0.0 && y >= 0.0 && x + y <= 1.0));

        for alpha in 0..=max_degree {
            for beta in 0..=(max_degree - alpha) {
                // Exact integral of x^a y^b over the unit triangle
                let exact = factorial(alpha) * factorial(beta) / factorial(alpha + beta + 2);
                let estimated = integrate(&rule, |&[x, y]| x.powi(alpha) * y.powi(beta));
                assert_scalar_eq!(estimated, exact, comp = abs, tol = 1e-13);
            }
        }
    }
}

#[test]
fn unit_tetrahedron_rules_integrate_total_degree_exactly() {
    for n in 1..=5 {
        let max_degree = (2 * n - 1) as i32;
        let rule = unit_tetrahedron_collapsed_gauss(n).unwrap();

        assert!(rule.0.iter().all(|&w| w > 0.0));
        assert_scalar_eq!(rule.0.iter().sum::<f64>(), 1.0 / 6.0, comp = abs, tol = 1e-13);

        for alpha in 0..=max_degree {
            for beta in 0..=(max_degree - alpha) {
                for gamma in 0..=(max_degree - alpha - beta) {
                    let exact =
                        factorial(alpha) * factorial(beta) * factorial(gamma) / factorial(alpha + beta + gamma + 3);
                    let estimated =
                        integrate(&rule, |&[x, y, z]| x.powi(alpha) * y.powi(beta) * z.powi(gamma));
                    assert_scalar_eq!(estimated, exact, comp = abs, tol = 1e-13);
                }
            }
        }
    }
}
