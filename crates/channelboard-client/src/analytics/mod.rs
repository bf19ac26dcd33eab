//! CSV report analytics.
//!
//! [`rows::parse_rows`] turns report text into [`RawRow`]s and
//! [`aggregate::aggregate`] folds those rows into summary metrics, the first
//! ten transactions and, for direct uploads, a title ranking and a monthly
//! revenue map. The fold is pure and never fails.

pub mod aggregate;
pub mod amount;
pub mod month;
pub mod ranking;
pub mod rows;

pub use aggregate::{
    Aggregation, ReportVariant, SummaryMetrics, TOP_TRANSACTIONS_LIMIT, TransactionRecord,
    aggregate,
};
pub use month::{MonthKey, MonthlyRevenue};
pub use ranking::{RankedEntry, TOP_TITLES_LIMIT, TitleCounter};
pub use rows::{RawRow, parse_rows};

pub const TRANSACTION_TYPE_COLUMN: &str = "Transaction Type";
pub const TRANSACTION_AMOUNT_COLUMN: &str = "Transaction Amount";
pub const DEVELOPER_SHARE_COLUMN: &str = "Developer Rev Share";
pub const VIDEO_TITLE_COLUMN: &str = "Video Title";
pub const TRANSACTION_DATE_COLUMN: &str = "Transaction Date";
