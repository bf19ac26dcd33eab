use crate::ClientResult;
use crate::analytics::{ReportVariant, aggregate, parse_rows};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{AnalyzeData, SummaryData, monthly_revenue_rows};
use crate::input::resolve_source;

const COMMAND: &str = "analyze";

#[derive(Debug, Default)]
pub struct AnalyzeOptions {
    pub path: Option<String>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<String>) -> ClientResult<SuccessEnvelope> {
    run_with_options(AnalyzeOptions {
        path,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: AnalyzeOptions) -> ClientResult<SuccessEnvelope> {
    let source = resolve_source(options.path, options.stdin_override, COMMAND)?;
    let rows = parse_rows(&source.content)?;
    let result = aggregate(&rows, ReportVariant::Direct);

    let data = AnalyzeData {
        source: source.kind.as_str().to_string(),
        source_ref: source.source_ref,
        summary: SummaryData::from(&result.summary),
        top_transactions: result.top_transactions,
        top_titles: result.top_titles.unwrap_or_default(),
        monthly_revenue: result
            .monthly_revenue
            .as_ref()
            .map(monthly_revenue_rows)
            .unwrap_or_default(),
    };
    success(COMMAND, data)
}
