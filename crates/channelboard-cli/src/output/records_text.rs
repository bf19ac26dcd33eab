use std::io;

use serde_json::{Map, Value};

use super::format::{Align, Column, key_value_rows, render_table, value_text};

pub fn render_record(command: &str, data: &Value) -> io::Result<String> {
    let record = data
        .get("record")
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other(format!("{command} output requires record")))?;

    let headline = match command {
        "record add" => "Record added.",
        _ => "Record updated.",
    };
    let mut lines = vec![headline.to_string(), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Collection:", value_text(record.get("collection"))),
            ("Record id:", value_text(record.get("id"))),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("Fields:".to_string());
    lines.extend(field_rows(record.get("fields").and_then(Value::as_object)));
    Ok(lines.join("\n"))
}

pub fn render_record_list(data: &Value) -> io::Result<String> {
    let collection = value_text(data.get("collection"));
    let records = data
        .get("records")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("record list output requires records"))?;

    if records.is_empty() {
        return Ok(format!(
            "No records in `{collection}`.\n\nAdd one with:\n  channelboard record add {collection} <key>=<value>"
        ));
    }

    let rows = records
        .iter()
        .map(|record| {
            vec![
                value_text(record.get("id")),
                fields_summary(record.get("fields").and_then(Value::as_object)),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("Records in `{collection}` ({}):", records.len())];
    lines.extend(render_table(
        &[
            Column {
                name: "Record",
                align: Align::Left,
            },
            Column {
                name: "Fields",
                align: Align::Left,
            },
        ],
        &rows,
    ));
    Ok(lines.join("\n"))
}

pub fn render_record_delete(data: &Value) -> io::Result<String> {
    let mut lines = vec![format!(
        "Record {} deleted from `{}`.",
        value_text(data.get("record_id")),
        value_text(data.get("collection"))
    )];
    if data.get("image_removed").and_then(Value::as_bool) == Some(true) {
        lines.push("Its stored image was removed too.".to_string());
    }
    Ok(lines.join("\n"))
}

pub fn render_collections(data: &Value) -> io::Result<String> {
    let collections = data
        .get("collections")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("record collections output requires collections"))?;

    if collections.is_empty() {
        return Ok("No collections yet.".to_string());
    }

    let rows = collections
        .iter()
        .map(|entry| {
            vec![
                value_text(entry.get("name")),
                value_text(entry.get("documents")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec!["Collections:".to_string()];
    lines.extend(render_table(
        &[
            Column {
                name: "Collection",
                align: Align::Left,
            },
            Column {
                name: "Records",
                align: Align::Right,
            },
        ],
        &rows,
    ));
    Ok(lines.join("\n"))
}

fn field_rows(fields: Option<&Map<String, Value>>) -> Vec<String> {
    let Some(fields) = fields.filter(|map| !map.is_empty()) else {
        return vec!["  (none)".to_string()];
    };
    let labels = fields
        .iter()
        .map(|(key, value)| (format!("{key}:"), value_text(Some(value))))
        .collect::<Vec<(String, String)>>();
    let entries = labels
        .iter()
        .map(|(label, value)| (label.as_str(), value.clone()))
        .collect::<Vec<(&str, String)>>();
    key_value_rows(&entries, 2)
}

fn fields_summary(fields: Option<&Map<String, Value>>) -> String {
    let Some(fields) = fields else {
        return String::new();
    };
    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", value_text(Some(value))))
        .collect::<Vec<String>>()
        .join(" ")
}
