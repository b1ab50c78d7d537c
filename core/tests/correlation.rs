//! Correlation matrix properties over generated tables.

use engagement_core::{
    correlation::CorrelationMatrix,
    generator::{generate, Variant},
    types::{LOYALTY_SCORE, SUPPORT_TICKETS, VISITS_PER_MONTH},
};

const TOL: f64 = 1e-9;

fn check_properties(matrix: &CorrelationMatrix) {
    let n = matrix.size();
    for i in 0..n {
        assert!(
            (matrix.get(i, i) - 1.0).abs() < TOL,
            "diagonal {i} is {}",
            matrix.get(i, i)
        );
        for j in 0..n {
            let r = matrix.get(i, j);
            assert!((-1.0..=1.0).contains(&r), "r[{i}][{j}] = {r} out of range");
            assert!((r - matrix.get(j, i)).abs() < TOL, "asymmetric at {i},{j}");
        }
    }
    assert!(matrix.is_symmetric(TOL));
}

#[test]
fn bounds_diagonal_and_symmetry_hold_across_seeds() {
    for seed in [1u64, 42, 99, 12_345, 0xDEAD_BEEF] {
        for variant in [Variant::Classic, Variant::Extended] {
            let table = generate(seed, 300, variant).unwrap();
            let matrix = CorrelationMatrix::from_table(&table).unwrap();
            assert_eq!(matrix.size(), table.len());
            assert_eq!(matrix.labels().len(), table.len());
            check_properties(&matrix);
        }
    }
}

#[test]
fn classic_metrics_are_nearly_uncorrelated() {
    let matrix = CorrelationMatrix::from_table(&generate(42, 200, Variant::Classic).unwrap())
        .unwrap();
    for i in 0..matrix.size() {
        for j in 0..matrix.size() {
            if i != j {
                assert!(
                    matrix.get(i, j).abs() < 0.3,
                    "independent metrics {} / {} correlate at {:.2}",
                    matrix.labels()[i],
                    matrix.labels()[j],
                    matrix.get(i, j)
                );
            }
        }
    }
}

#[test]
fn extended_metrics_share_the_engagement_factor() {
    let matrix = CorrelationMatrix::from_table(&generate(42, 1000, Variant::Extended).unwrap())
        .unwrap();
    let visits_loyalty = matrix.get_named(VISITS_PER_MONTH, LOYALTY_SCORE).unwrap();
    assert!(visits_loyalty > 0.4, "expected strong positive, got {visits_loyalty:.2}");

    let tickets_loyalty = matrix.get_named(SUPPORT_TICKETS, LOYALTY_SCORE).unwrap();
    assert!(tickets_loyalty < 0.0, "expected negative, got {tickets_loyalty:.2}");
}

#[test]
fn matrix_serializes_with_labels() {
    let matrix = CorrelationMatrix::from_table(&generate(42, 50, Variant::Classic).unwrap())
        .unwrap();
    let json = serde_json::to_value(&matrix).unwrap();
    assert_eq!(json["labels"][0], VISITS_PER_MONTH);
    assert_eq!(json["values"].as_array().unwrap().len(), 25);
    assert_eq!(json["values"][0], 1.0);
}
