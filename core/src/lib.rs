//! Synthetic customer-engagement data, its correlation matrix, and an
//! exact-size annotated heatmap PNG.

pub mod colormap;
pub mod config;
pub mod correlation;
pub mod error;
pub mod figure;
pub mod fonts;
pub mod generator;
pub mod heatmap;
pub mod pipeline;
pub mod rng;
pub mod table;
pub mod types;
