//! Shared primitive types and metric names used across the pipeline.

/// Master seed for a run. Every column stream is derived from it.
pub type Seed = u64;

/// The name of one metric column.
pub type MetricName = String;

pub const VISITS_PER_MONTH: &str = "Visits_Per_Month";
pub const AVG_SESSION_DURATION: &str = "Avg_Session_Duration";
pub const PURCHASE_FREQUENCY: &str = "Purchase_Frequency";
pub const AVG_ORDER_VALUE: &str = "Avg_Order_Value";
pub const LOYALTY_SCORE: &str = "Loyalty_Score";
pub const SUPPORT_TICKETS: &str = "Support_Tickets";
