use serde::Serialize;

use crate::analytics::amount::parse_amount;
use crate::analytics::month::{MonthKey, MonthlyRevenue};
use crate::analytics::ranking::{RankedEntry, TOP_TITLES_LIMIT, TitleCounter};
use crate::analytics::rows::RawRow;
use crate::analytics::{
    DEVELOPER_SHARE_COLUMN, TRANSACTION_AMOUNT_COLUMN, TRANSACTION_DATE_COLUMN,
    TRANSACTION_TYPE_COLUMN, VIDEO_TITLE_COLUMN,
};

pub const TOP_TRANSACTIONS_LIMIT: usize = 10;

/// Which report flavour to fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportVariant {
    /// Uploaded store report: tracks developer share, lists only positive
    /// amounts.
    Store,
    /// Direct CSV analysis: lists every transaction, ranks video titles and
    /// buckets revenue by month.
    Direct,
}

impl ReportVariant {
    const fn tracks_net_revenue(self) -> bool {
        matches!(self, Self::Store)
    }

    fn keeps_transaction(self, amount: f64) -> bool {
        match self {
            Self::Store => amount > 0.0,
            Self::Direct => true,
        }
    }

    const fn ranks_titles(self) -> bool {
        matches!(self, Self::Direct)
    }

    const fn buckets_by_month(self) -> bool {
        matches!(self, Self::Direct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryMetrics {
    pub rows_read: i64,
    pub installs: i64,
    pub uninstalls: i64,
    pub gross_revenue: f64,
    /// Sum of developer share; only tracked for [`ReportVariant::Store`].
    pub net_revenue: Option<f64>,
}

impl SummaryMetrics {
    /// Purchases minus cancellations. Can be negative.
    pub fn net_installs(&self) -> i64 {
        self.installs - self.uninstalls
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub summary: SummaryMetrics,
    pub top_transactions: Vec<TransactionRecord>,
    pub top_titles: Option<Vec<RankedEntry>>,
    pub monthly_revenue: Option<MonthlyRevenue>,
}

pub fn aggregate<'a, I>(rows: I, variant: ReportVariant) -> Aggregation
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut summary = SummaryMetrics {
        net_revenue: variant.tracks_net_revenue().then_some(0.0),
        ..SummaryMetrics::default()
    };
    let mut transactions = Vec::new();
    let mut titles = TitleCounter::default();
    let mut monthly = MonthlyRevenue::default();

    for row in rows {
        summary.rows_read += 1;

        let raw_type = row.get(TRANSACTION_TYPE_COLUMN);
        // Unrecognized types fall through: no counter moves, revenue still does.
        match raw_type.map(str::to_lowercase).as_deref() {
            Some("purchase") => summary.installs += 1,
            Some("cancellation") => summary.uninstalls += 1,
            _ => {}
        }

        let amount = parse_amount(row.get(TRANSACTION_AMOUNT_COLUMN));
        summary.gross_revenue += amount;

        if let Some(net_revenue) = summary.net_revenue.as_mut() {
            *net_revenue += parse_amount(row.get(DEVELOPER_SHARE_COLUMN));
        }

        let raw_date = row.get(TRANSACTION_DATE_COLUMN);
        if variant.keeps_transaction(amount) {
            transactions.push(TransactionRecord {
                date: raw_date.map(str::to_string),
                transaction_type: raw_type.map(str::to_string),
                amount,
            });
        }

        if variant.ranks_titles()
            && let Some(title) = row.get(VIDEO_TITLE_COLUMN)
            && !title.is_empty()
        {
            titles.record(title);
        }

        if variant.buckets_by_month() {
            monthly.add(MonthKey::from_date_field(raw_date), amount);
        }
    }

    // First ten in encounter order, not the ten largest.
    transactions.truncate(TOP_TRANSACTIONS_LIMIT);

    Aggregation {
        summary,
        top_transactions: transactions,
        top_titles: variant
            .ranks_titles()
            .then(|| titles.top(TOP_TITLES_LIMIT)),
        monthly_revenue: variant.buckets_by_month().then_some(monthly),
    }
}
