use std::io;

use serde_json::{Map, Value};

use super::format::{Align, Column, format_money, key_value_rows, render_table, value_text};

pub fn render_analyze(data: &Value) -> io::Result<String> {
    let summary = required_object(data, "summary", "analyze")?;

    let source = match data.get("source_ref").and_then(Value::as_str) {
        Some(path) => path.to_string(),
        None => "stdin".to_string(),
    };
    let mut lines = vec![format!("Revenue analysis for {source}"), String::new()];
    lines.push("Summary:".to_string());
    lines.extend(summary_rows(summary));

    lines.push(String::new());
    lines.extend(transactions_section(required_array(
        data,
        "top_transactions",
        "analyze",
    )?));

    let titles = required_array(data, "top_titles", "analyze")?;
    lines.push(String::new());
    if titles.is_empty() {
        lines.push("Top video titles: none".to_string());
    } else {
        lines.push("Top video titles:".to_string());
        let rows = titles
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                vec![
                    (index + 1).to_string(),
                    value_text(entry.get("title")),
                    value_text(entry.get("count")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(
            &[
                Column {
                    name: "#",
                    align: Align::Right,
                },
                Column {
                    name: "Title",
                    align: Align::Left,
                },
                Column {
                    name: "Count",
                    align: Align::Right,
                },
            ],
            &rows,
        ));
    }

    let months = required_array(data, "monthly_revenue", "analyze")?;
    lines.push(String::new());
    if months.is_empty() {
        lines.push("Monthly revenue: none".to_string());
    } else {
        lines.push("Monthly revenue:".to_string());
        let rows = months
            .iter()
            .map(|row| {
                vec![
                    value_text(row.get("month")),
                    money_text(row.get("revenue")),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.extend(render_table(
            &[
                Column {
                    name: "Month",
                    align: Align::Left,
                },
                Column {
                    name: "Revenue",
                    align: Align::Right,
                },
            ],
            &rows,
        ));
    }

    Ok(lines.join("\n"))
}

pub fn render_report_upload(data: &Value) -> io::Result<String> {
    let report = required_object(data, "report", "report upload")?;
    let mut lines = vec!["Report uploaded.".to_string(), String::new()];
    lines.extend(report_rows(report));
    lines.push(String::new());
    lines.push(format!(
        "Rows read: {}",
        value_text(data.get("rows_read"))
    ));
    lines.push(String::new());
    lines.push("Next:".to_string());
    lines.push(format!(
        "  channelboard report show {}",
        value_text(report.get("report_id"))
    ));
    Ok(lines.join("\n"))
}

pub fn render_report_list(data: &Value) -> io::Result<String> {
    let reports = required_array(data, "reports", "report list")?;
    if reports.is_empty() {
        return Ok([
            "No reports found.",
            "",
            "Upload one first:",
            "  channelboard report upload <path> --year <year> --month <month>",
        ]
        .join("\n"));
    }

    let rows = reports
        .iter()
        .map(|report| {
            vec![
                value_text(report.get("report_id")),
                period_text(report.get("selected_year"), report.get("selected_month")),
                value_text(report.get("name")),
                value_text(report.get("size_bytes")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("Reports ({}):", reports.len())];
    lines.extend(render_table(
        &[
            Column {
                name: "Report",
                align: Align::Left,
            },
            Column {
                name: "Period",
                align: Align::Left,
            },
            Column {
                name: "Name",
                align: Align::Left,
            },
            Column {
                name: "Bytes",
                align: Align::Right,
            },
        ],
        &rows,
    ));
    Ok(lines.join("\n"))
}

pub fn render_report_show(data: &Value) -> io::Result<String> {
    let report = required_object(data, "report", "report show")?;
    let summary = required_object(data, "summary", "report show")?;

    let mut lines = vec![
        format!(
            "Report {} ({})",
            value_text(report.get("name")),
            period_text(report.get("selected_year"), report.get("selected_month"))
        ),
        String::new(),
        "Summary:".to_string(),
    ];
    lines.extend(summary_rows(summary));
    lines.push(String::new());
    lines.extend(transactions_section(required_array(
        data,
        "top_transactions",
        "report show",
    )?));
    Ok(lines.join("\n"))
}

pub fn render_report_remove(data: &Value) -> io::Result<String> {
    let mut lines = vec![format!(
        "Report {} removed.",
        value_text(data.get("report_id"))
    )];
    if data.get("object_removed").and_then(Value::as_bool) != Some(true) {
        lines.push("The stored CSV file was already missing.".to_string());
    }
    Ok(lines.join("\n"))
}

fn summary_rows(summary: &Map<String, Value>) -> Vec<String> {
    let mut entries = vec![
        ("Rows read:", value_text(summary.get("rows_read"))),
        ("Installs:", value_text(summary.get("installs"))),
        ("Uninstalls:", value_text(summary.get("uninstalls"))),
        ("Net installs:", value_text(summary.get("net_installs"))),
        ("Gross revenue:", money_text(summary.get("gross_revenue"))),
    ];
    if summary.contains_key("net_revenue") {
        entries.push(("Net revenue:", money_text(summary.get("net_revenue"))));
    }
    key_value_rows(&entries, 2)
}

fn report_rows(report: &Map<String, Value>) -> Vec<String> {
    key_value_rows(
        &[
            ("Report id:", value_text(report.get("report_id"))),
            ("Name:", value_text(report.get("name"))),
            (
                "Period:",
                period_text(report.get("selected_year"), report.get("selected_month")),
            ),
            ("Stored at:", value_text(report.get("url"))),
            ("Size:", format!("{} bytes", value_text(report.get("size_bytes")))),
        ],
        2,
    )
}

fn transactions_section(transactions: &[Value]) -> Vec<String> {
    if transactions.is_empty() {
        return vec!["Transactions: none".to_string()];
    }

    let rows = transactions
        .iter()
        .map(|record| {
            vec![
                value_text(record.get("date")),
                value_text(record.get("type")),
                money_text(record.get("amount")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("First {} transactions:", transactions.len())];
    lines.extend(render_table(
        &[
            Column {
                name: "Date",
                align: Align::Left,
            },
            Column {
                name: "Type",
                align: Align::Left,
            },
            Column {
                name: "Amount",
                align: Align::Right,
            },
        ],
        &rows,
    ));
    lines
}

fn money_text(value: Option<&Value>) -> String {
    match value.and_then(Value::as_f64) {
        Some(amount) => format_money(amount),
        None => "-".to_string(),
    }
}

fn period_text(year: Option<&Value>, month: Option<&Value>) -> String {
    match (year.and_then(Value::as_i64), month.and_then(Value::as_i64)) {
        (Some(year), Some(month)) => format!("{year}-{month:02}"),
        _ => "-".to_string(),
    }
}

fn required_object<'a>(
    data: &'a Value,
    key: &str,
    command: &str,
) -> io::Result<&'a Map<String, Value>> {
    data.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}

fn required_array<'a>(data: &'a Value, key: &str, command: &str) -> io::Result<&'a [Value]> {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}
