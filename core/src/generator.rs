//! Synthetic customer-engagement data.
//!
//! Two variants share the column names:
//!   - Classic:  five independent metrics, no correlation by construction.
//!   - Extended: one latent engagement factor per customer feeds every
//!               metric, plus per-metric noise. Values are floored at 0
//!               and rounded to cents.
//!
//! Each column draws from its own ColumnSlot stream, so the table for a
//! given (seed, customers, variant) is bit-identical on every run.

use crate::{
    error::{ChartError, ChartResult},
    rng::{ColumnSlot, MetricRng, RngBank},
    table::{round2, MetricTable},
    types::{
        Seed, AVG_ORDER_VALUE, AVG_SESSION_DURATION, LOYALTY_SCORE, PURCHASE_FREQUENCY,
        SUPPORT_TICKETS, VISITS_PER_MONTH,
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const CLASSIC_CUSTOMERS: usize = 200;
pub const EXTENDED_CUSTOMERS: usize = 1000;

const ENGAGEMENT_MEAN: f64 = 5.0;
const ENGAGEMENT_STD: f64 = 1.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Classic,
    Extended,
}

impl Variant {
    pub fn default_customers(&self) -> usize {
        match self {
            Self::Classic => CLASSIC_CUSTOMERS,
            Self::Extended => EXTENDED_CUSTOMERS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Extended => "extended",
        }
    }
}

impl FromStr for Variant {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "extended" => Ok(Self::Extended),
            other => Err(ChartError::InvalidConfig(format!("unknown variant '{other}'"))),
        }
    }
}

/// Generate the metric table for one run.
pub fn generate(seed: Seed, customers: usize, variant: Variant) -> ChartResult<MetricTable> {
    if customers == 0 {
        return Err(ChartError::InvalidConfig("customers must be > 0".into()));
    }
    let bank = RngBank::new(seed);
    let table = match variant {
        Variant::Classic => generate_classic(&bank, customers)?,
        Variant::Extended => generate_extended(&bank, customers)?,
    };
    log::debug!(
        "generator: seed={seed} variant={} rows={} columns={}",
        variant.as_str(),
        table.rows(),
        table.len()
    );
    Ok(table)
}

fn sample_column(
    bank: &RngBank,
    slot: ColumnSlot,
    n: usize,
    mut draw: impl FnMut(&mut MetricRng) -> f64,
) -> Vec<f64> {
    let mut rng = bank.for_column(slot);
    (0..n).map(|_| draw(&mut rng)).collect()
}

fn generate_classic(bank: &RngBank, n: usize) -> ChartResult<MetricTable> {
    MetricTable::new()
        .with_column(
            VISITS_PER_MONTH,
            sample_column(bank, ColumnSlot::Visits, n, |r| r.poisson(5.0)),
        )?
        .with_column(
            AVG_SESSION_DURATION, // minutes
            sample_column(bank, ColumnSlot::SessionDuration, n, |r| r.normal(15.0, 5.0)),
        )?
        .with_column(
            PURCHASE_FREQUENCY,
            sample_column(bank, ColumnSlot::PurchaseFrequency, n, |r| r.poisson(2.0)),
        )?
        .with_column(
            AVG_ORDER_VALUE, // dollars
            sample_column(bank, ColumnSlot::OrderValue, n, |r| r.normal(50.0, 20.0)),
        )?
        .with_column(
            LOYALTY_SCORE, // 0–100 scale
            sample_column(bank, ColumnSlot::Loyalty, n, |r| r.uniform(0.0, 100.0)),
        )
}

fn generate_extended(bank: &RngBank, n: usize) -> ChartResult<MetricTable> {
    let engagement = sample_column(bank, ColumnSlot::Engagement, n, |r| {
        r.normal(ENGAGEMENT_MEAN, ENGAGEMENT_STD)
    });
    let e = engagement.as_slice();

    MetricTable::new()
        .with_column(
            VISITS_PER_MONTH,
            derive_column(bank, e, ColumnSlot::Visits, 1.2, |r| r.poisson(2.0)),
        )?
        .with_column(
            AVG_SESSION_DURATION,
            derive_column(bank, e, ColumnSlot::SessionDuration, 2.5, |r| r.normal(0.0, 4.0)),
        )?
        .with_column(
            PURCHASE_FREQUENCY,
            derive_column(bank, e, ColumnSlot::PurchaseFrequency, 0.4, |r| r.poisson(1.0)),
        )?
        .with_column(
            AVG_ORDER_VALUE,
            derive_column(bank, e, ColumnSlot::OrderValue, 6.0, |r| r.normal(20.0, 12.0)),
        )?
        .with_column(
            LOYALTY_SCORE,
            derive_column(bank, e, ColumnSlot::Loyalty, 10.0, |r| r.normal(10.0, 8.0)),
        )?
        .with_column(
            SUPPORT_TICKETS,
            derive_column(bank, e, ColumnSlot::SupportTickets, -0.3, |r| r.poisson(3.0)),
        )
}

/// weight * engagement + noise, floored at 0 and rounded to cents.
fn derive_column(
    bank: &RngBank,
    engagement: &[f64],
    slot: ColumnSlot,
    weight: f64,
    mut noise: impl FnMut(&mut MetricRng) -> f64,
) -> Vec<f64> {
    let mut rng = bank.for_column(slot);
    engagement
        .iter()
        .map(|e| round2((weight * e + noise(&mut rng)).max(0.0)))
        .collect()
}
