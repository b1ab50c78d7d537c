//! Column-oriented metric table.
//!
//! RULE: every column has the same number of rows. The table rejects
//! any push that would break this, so downstream code never re-checks.

use crate::{
    error::{ChartError, ChartResult},
    types::MetricName,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricColumn {
    pub name: MetricName,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    columns: Vec<MetricColumn>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<MetricName>, values: Vec<f64>) -> ChartResult<()> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(ChartError::DuplicateColumn { column: name });
        }
        if let Some(first) = self.columns.first() {
            if first.values.len() != values.len() {
                return Err(ChartError::RaggedTable {
                    column: name,
                    expected: first.values.len(),
                    actual: values.len(),
                });
            }
        }
        self.columns.push(MetricColumn { name, values });
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<MetricName>, values: Vec<f64>) -> ChartResult<Self> {
        self.push_column(name, values)?;
        Ok(self)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of rows (customers).
    pub fn rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn columns(&self) -> &[MetricColumn] {
        &self.columns
    }
}

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
