//! Dashboard analytics.

pub mod analytics;
