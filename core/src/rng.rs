//! Seeded random streams, one per generated column.
//!
//! A run has a single master seed. Each column draws from its own Pcg64Mcg,
//! seeded from that master seed mixed with the column's fixed slot number.
//! Streams never share state, so a column's values depend only on the seed,
//! its slot and the row count. Appending a column leaves the others as
//! they were. No platform RNG is used anywhere in generation.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Above this mean the Poisson sampler switches to a normal approximation;
/// Knuth's product method underflows `exp(-lambda)` long before it gets slow.
const POISSON_KNUTH_LIMIT: f64 = 30.0;

/// A named, deterministic RNG for a single column.
pub struct MetricRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl MetricRng {
    /// Create a column RNG from the master seed and a stable
    /// column index. The index must never change once assigned.
    pub fn new(master_seed: u64, column_index: u64) -> Self {
        let derived_seed = master_seed ^ (column_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Uniform float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Normal sample via Box–Muller. Uses one pair of uniforms per draw
    /// so a column's stream position depends only on its row count.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // 1 - u keeps the log argument in (0, 1].
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + std_dev * z
    }

    /// Poisson count with mean `lambda`, returned as f64 for table use.
    pub fn poisson(&mut self, lambda: f64) -> f64 {
        if lambda <= 0.0 {
            return 0.0;
        }
        if lambda >= POISSON_KNUTH_LIMIT {
            return self.normal(lambda, lambda.sqrt()).round().max(0.0);
        }
        let limit = (-lambda).exp();
        let mut k = 0u64;
        let mut product = self.next_f64();
        while product > limit {
            k += 1;
            product *= self.next_f64();
        }
        k as f64
    }
}

/// All column RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_column(&self, slot: ColumnSlot) -> MetricRng {
        MetricRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Slot numbers feed the seed derivation. Existing numbers are fixed;
/// new columns take the next free one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum ColumnSlot {
    Visits = 0,
    SessionDuration = 1,
    PurchaseFrequency = 2,
    OrderValue = 3,
    Loyalty = 4,
    Engagement = 5,
    SupportTickets = 6,
}

impl ColumnSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Visits => "visits",
            Self::SessionDuration => "session_duration",
            Self::PurchaseFrequency => "purchase_frequency",
            Self::OrderValue => "order_value",
            Self::Loyalty => "loyalty",
            Self::Engagement => "engagement",
            Self::SupportTickets => "support_tickets",
        }
    }
}
