//! Stats module
//!
//! Read-only aggregates for the dashboard and history views. Queries live
//! in `service`, the folding and zero-filling of their rows in `aggregate`.

pub mod aggregate;
mod service;

pub use aggregate::{
    BalanceStats, CategoryStat, HistoryDataPoint, HistoryPeriod, HistoryTimeframe, MonthlyStat,
};
pub use service::StatsService;
