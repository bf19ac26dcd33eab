pub mod analyze;
pub(crate) mod common;
pub mod records;
pub mod report;
