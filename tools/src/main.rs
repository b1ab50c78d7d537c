//! chart-runner: headless runner for the customer engagement heatmap.
//!
//! Usage:
//!   chart-runner
//!   chart-runner --variant extended --seed 7 --out extended.png
//!   chart-runner --config chart.json --matrix-json corr.json

use anyhow::Result;
use engagement_core::{
    colormap::Colormap, config::ChartConfig, correlation::CorrelationMatrix, fonts,
    generator::Variant, pipeline,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = build_config(&args)?;
    let matrix_json = string_arg(&args, "--matrix-json");

    println!("Customer engagement chart — chart-runner");
    println!("  seed:       {}", config.seed);
    println!("  variant:    {}", config.variant.as_str());
    println!("  customers:  {}", config.customers);
    println!("  colormap:   {}", config.heatmap.colormap.as_str());
    println!("  output:     {}", config.output.display());
    println!();

    let report = pipeline::run(&config)?;

    if let Some(path) = matrix_json {
        let json = serde_json::to_string_pretty(&report.matrix)?;
        std::fs::write(path, json)?;
        log::info!("wrote correlation matrix to {path}");
    }

    print_summary(&report);
    Ok(())
}

fn build_config(args: &[String]) -> Result<ChartConfig> {
    let mut config = match string_arg(args, "--config") {
        Some(path) => ChartConfig::load(path)?,
        None => match string_arg(args, "--variant") {
            Some(v) => ChartConfig::for_variant(v.parse::<Variant>()?),
            None => ChartConfig::classic(),
        },
    };

    // A --variant next to --config only swaps the generator.
    if let (Some(_), Some(v)) = (string_arg(args, "--config"), string_arg(args, "--variant")) {
        config.variant = v.parse::<Variant>()?;
        config.customers = config.variant.default_customers();
    }

    config.seed = parse_arg(args, "--seed", config.seed);
    config.customers = parse_arg(args, "--customers", config.customers);
    if let Some(out) = string_arg(args, "--out") {
        config.output = out.into();
    }
    if let Some(name) = string_arg(args, "--colormap") {
        config.heatmap.colormap = name.parse::<Colormap>()?;
    }
    if has_flag(args, "--mask") {
        config.heatmap.mask_upper = true;
    }
    if has_flag(args, "--hide-axis") {
        config.heatmap.show_axis = false;
    }
    if has_flag(args, "--verbose") {
        config.verbose = true;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(report: &pipeline::ChartReport) {
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  output:     {}", report.output.display());
    println!("  dimensions: {}x{}", report.width, report.height);
    println!("  rows:       {}", report.rows);
    match fonts::registered_font() {
        Some(source) => println!("  font:       {source}"),
        None => println!("  font:       (not registered)"),
    }
    println!();
    println!("=== CORRELATION MATRIX ===");
    print_matrix(&report.matrix);
}

fn print_matrix(matrix: &CorrelationMatrix) {
    let width = matrix.labels().iter().map(|l| l.len()).max().unwrap_or(0);
    for (i, label) in matrix.labels().iter().enumerate() {
        let row: Vec<String> = (0..matrix.size())
            .map(|j| format!("{:>6.2}", matrix.get(i, j)))
            .collect();
        println!("  {label:<width$} {}", row.join(" "));
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    match string_arg(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("ignoring {flag} {raw:?}: not a valid value");
            default
        }),
        None => default,
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}
