//! Domain services

pub mod balance;
pub mod factory;
pub mod orders;
pub mod plate;
pub mod record_id;
pub mod records_query;
pub mod report;
pub mod validation;

pub use balance::{
    balance_totals, release_balances, site_summaries, BalanceTotals, ReleaseBalance, SiteBalance,
};
pub use factory::{factory_balances, FactoryBalanceRow};
pub use orders::{order_options, OrderOption};
pub use plate::format_car_plate;
pub use record_id::{generate_record_id, new_record_id};
pub use records_query::{query_records, record_stats, unique_sites, RecordQuery, RecordStats};
pub use report::{period_report, render_period_report, PeriodReport, SiteReportRow};
pub use validation::{available_balance, validate_record, validate_release};
