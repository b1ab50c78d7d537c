//! Pearson correlation matrix over a metric table.
//!
//! Constant columns have no defined coefficient. Their rows, columns and
//! diagonal entry are NaN rather than an error; the renderer leaves those
//! cells blank.

use crate::{
    error::{ChartError, ChartResult},
    table::MetricTable,
    types::MetricName,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    labels: Vec<MetricName>,
    /// Row-major, `labels.len()²` entries.
    values: Vec<f64>,
}

impl CorrelationMatrix {
    /// Build from labels and row-major values. Used by tests and tooling;
    /// the pipeline goes through `from_table`.
    pub fn from_parts(labels: Vec<MetricName>, values: Vec<f64>) -> ChartResult<Self> {
        let n = labels.len();
        if n == 0 {
            return Err(ChartError::EmptyMatrix);
        }
        if values.len() != n * n {
            return Err(ChartError::NonSquare {
                rows: n,
                cols: values.len() / n,
            });
        }
        Ok(Self { labels, values })
    }

    pub fn from_table(table: &MetricTable) -> ChartResult<Self> {
        let n = table.len();
        if n == 0 || table.rows() == 0 {
            return Err(ChartError::EmptyMatrix);
        }
        let columns = table.columns();
        let mut values = vec![f64::NAN; n * n];

        for i in 0..n {
            let xi = &columns[i].values;
            if !is_constant(xi) {
                values[i * n + i] = 1.0;
            } else {
                log::warn!(
                    "correlation: column '{}' is constant, coefficients are NaN",
                    columns[i].name
                );
            }
            for j in (i + 1)..n {
                let r = pearson(xi, &columns[j].values);
                values[i * n + j] = r;
                values[j * n + i] = r;
            }
        }

        Ok(Self {
            labels: table.names().into_iter().map(String::from).collect(),
            values,
        })
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[MetricName] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size() + col]
    }

    pub fn get_named(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.get(i, j))
    }

    /// True if every pair (i, j) matches (j, i) within `tol`.
    /// NaN entries must be NaN on both sides.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| {
            (0..n).all(|j| {
                let (a, b) = (self.get(i, j), self.get(j, i));
                (a.is_nan() && b.is_nan()) || (a - b).abs() <= tol
            })
        })
    }

    /// Smallest and largest finite entry, or None if there are none.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Sample Pearson correlation of two equal-length series.
/// NaN when either series is constant or has fewer than two points.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if is_constant(&x[..n]) || is_constant(&y[..n]) {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Exact comparison. A repeated 0.1 has a nonzero floating-point variance.
fn is_constant(x: &[f64]) -> bool {
    x.len() < 2 || x.iter().all(|v| *v == x[0])
}
