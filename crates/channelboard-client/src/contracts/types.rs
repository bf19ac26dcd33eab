use serde::{Deserialize, Serialize};

use crate::analytics::{MonthlyRevenue, RankedEntry, SummaryMetrics, TransactionRecord};
use crate::store::{CollectionSummary, Document};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryData {
    pub rows_read: i64,
    pub installs: i64,
    pub uninstalls: i64,
    pub net_installs: i64,
    pub gross_revenue: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_revenue: Option<f64>,
}

impl From<&SummaryMetrics> for SummaryData {
    fn from(summary: &SummaryMetrics) -> Self {
        Self {
            rows_read: summary.rows_read,
            installs: summary.installs,
            uninstalls: summary.uninstalls,
            net_installs: summary.net_installs(),
            gross_revenue: summary.gross_revenue,
            net_revenue: summary.net_revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenueRow {
    pub month: String,
    pub revenue: f64,
}

/// Chronological rows; a JSON object would lose month order.
pub fn monthly_revenue_rows(monthly: &MonthlyRevenue) -> Vec<MonthlyRevenueRow> {
    monthly
        .iter()
        .map(|(month, revenue)| MonthlyRevenueRow {
            month: month.to_string(),
            revenue: *revenue,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeData {
    pub source: String,
    pub source_ref: Option<String>,
    pub summary: SummaryData,
    pub top_transactions: Vec<TransactionRecord>,
    pub top_titles: Vec<RankedEntry>,
    pub monthly_revenue: Vec<MonthlyRevenueRow>,
}

/// Fields a report file document carries in the `csv_files` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFileFields {
    pub name: String,
    pub selected_year: i32,
    pub selected_month: u32,
    pub url: String,
    pub size_bytes: u64,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFileRow {
    pub report_id: String,
    #[serde(flatten)]
    pub fields: ReportFileFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportUploadData {
    pub report: ReportFileRow,
    pub rows_read: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportListFilters {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportListData {
    pub filters: ReportListFilters,
    pub reports: Vec<ReportFileRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportShowData {
    pub report: ReportFileRow,
    pub summary: SummaryData,
    pub top_transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRemoveData {
    pub report_id: String,
    pub object_removed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordData {
    pub record: Document,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordListData {
    pub collection: String,
    pub records: Vec<Document>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordDeleteData {
    pub collection: String,
    pub record_id: String,
    pub image_removed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionsData {
    pub collections: Vec<CollectionSummary>,
}
