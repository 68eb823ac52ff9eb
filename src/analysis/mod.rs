//! Sales aggregation and the dashboard query service.

pub mod aggregator;
pub mod service;

pub use aggregator::share_of_total;
pub use service::{AnalyticsService, DashboardSettings};
