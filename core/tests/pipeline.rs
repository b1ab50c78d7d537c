//! End-to-end runs of the chart pipeline.

use engagement_core::{
    config::ChartConfig,
    generator::Variant,
    pipeline,
    types::{
        AVG_ORDER_VALUE, AVG_SESSION_DURATION, LOYALTY_SCORE, PURCHASE_FREQUENCY,
        VISITS_PER_MONTH,
    },
};
use std::path::PathBuf;

fn temp_png(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("engagement-run-{name}-{}.png", std::process::id()))
}

#[test]
fn seed_42_scenario() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = ChartConfig {
        output: temp_png("scenario"),
        ..ChartConfig::classic()
    };
    assert_eq!(config.seed, 42);
    assert_eq!(config.customers, 200);

    let report = pipeline::run(&config).expect("pipeline run");
    let m = &report.matrix;

    assert_eq!(report.rows, 200);
    assert_eq!(
        m.labels(),
        &[
            VISITS_PER_MONTH,
            AVG_SESSION_DURATION,
            PURCHASE_FREQUENCY,
            AVG_ORDER_VALUE,
            LOYALTY_SCORE
        ]
    );
    assert_eq!(m.size(), 5);
    assert!(m.is_symmetric(1e-9));
    for i in 0..5 {
        assert_eq!(format!("{:.2}", m.get(i, i)), "1.00");
    }

    assert!(report.output.exists());
    assert_eq!((report.width, report.height), (512, 512));
    assert_eq!(image::image_dimensions(&report.output).unwrap(), (512, 512));
    std::fs::remove_file(&report.output).ok();
}

#[test]
fn repeated_runs_produce_identical_dimensions() {
    let first = ChartConfig {
        output: temp_png("repeat-a"),
        ..ChartConfig::extended()
    };
    let second = ChartConfig {
        output: temp_png("repeat-b"),
        ..first.clone()
    };

    let a = pipeline::run(&first).unwrap();
    let b = pipeline::run(&second).unwrap();

    assert_eq!(
        image::image_dimensions(&a.output).unwrap(),
        image::image_dimensions(&b.output).unwrap()
    );
    assert_eq!((a.width, a.height), (512, 512));
    assert_eq!(a.matrix, b.matrix);
    std::fs::remove_file(&a.output).ok();
    std::fs::remove_file(&b.output).ok();
}

#[test]
fn extended_run_has_six_metrics() {
    let config = ChartConfig {
        output: temp_png("extended"),
        verbose: false,
        ..ChartConfig::extended()
    };
    let report = pipeline::run(&config).unwrap();
    assert_eq!(report.rows, 1000);
    assert_eq!(report.matrix.size(), 6);
    std::fs::remove_file(&report.output).ok();
}

#[test]
fn analyze_skips_rendering() {
    let config = ChartConfig {
        variant: Variant::Extended,
        ..ChartConfig::default_test()
    };
    let (table, matrix) = pipeline::analyze(&config).unwrap();
    assert_eq!(table.rows(), 50);
    assert_eq!(matrix.size(), table.len());
}

#[test]
fn invalid_config_fails_before_writing() {
    let config = ChartConfig {
        customers: 0,
        output: temp_png("invalid"),
        ..ChartConfig::classic()
    };
    assert!(pipeline::run(&config).is_err());
    assert!(!config.output.exists());
}

#[test]
fn unwritable_output_propagates() {
    let config = ChartConfig {
        output: std::env::temp_dir()
            .join("engagement-no-such-dir")
            .join("deeper")
            .join("chart.png"),
        ..ChartConfig::default_test()
    };
    assert!(pipeline::run(&config).is_err());
}
