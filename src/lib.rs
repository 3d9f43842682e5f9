//! Marketplace bid grader.
//!
//! Aggregates observed listing prices and grades a prospective purchase at a
//! bid price. The core is pure and synchronous:
//!
//! - [`stats::aggregate`] reduces raw prices to [`MarketStatistics`]
//! - [`fees::fees`] and [`fees::net_profit`] model selling fees
//! - [`grader::grade_full`] is the weighted multi-factor engine
//! - [`simple::grade_simple`] grades from an average price alone
//!
//! [`market`] holds the async search clients that feed it.

pub mod config;
pub mod error;
pub mod fees;
pub mod grader;
pub mod loader;
pub mod market;
pub mod model;
pub mod reasoning;
pub mod report;
pub mod simple;
pub mod stats;

pub use fees::{fees, net_profit};
pub use grader::{grade_bids, grade_full};
pub use model::{
    Confidence, FeeBreakdown, Grade, GradeResult, Listing, MarketStatistics, NetProfit, RiskLevel,
    SimpleGrade,
};
pub use simple::{grade_simple, Strategy};
pub use stats::aggregate;
