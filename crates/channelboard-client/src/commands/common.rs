use std::path::Path;

use serde_json::{Map, Value};

use crate::setup::{SetupContext, ensure_initialized_with_home_override};
use crate::{ClientError, ClientResult};

pub(crate) const MIN_REPORT_YEAR: i32 = 1970;
pub(crate) const MAX_REPORT_YEAR: i32 = 9999;

pub(crate) fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    ensure_initialized_with_home_override(home_override)
}

pub(crate) fn validate_year(year: i32, command: &str) -> ClientResult<i32> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("Year `{year}` is out of range. Use a year from {MIN_REPORT_YEAR} to {MAX_REPORT_YEAR}."),
            Some(command),
        ));
    }
    Ok(year)
}

pub(crate) fn validate_month(month: u32, command: &str) -> ClientResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(ClientError::invalid_argument_for_command(
            &format!("Month `{month}` is out of range. Use a month from 1 to 12."),
            Some(command),
        ));
    }
    Ok(month)
}

/// Turns `key=value` arguments into document fields.
///
/// Values that parse as a JSON scalar (`42`, `true`, `null`, `"text"`) keep
/// that type; anything else is stored as the literal string. Later
/// assignments to the same key win.
pub(crate) fn parse_field_assignments(
    assignments: &[String],
    command: &str,
) -> ClientResult<Map<String, Value>> {
    let mut fields = Map::new();
    for assignment in assignments {
        let Some((raw_key, raw_value)) = assignment.split_once('=') else {
            return Err(ClientError::invalid_argument_for_command(
                &format!("Field `{assignment}` is not a `key=value` pair."),
                Some(command),
            ));
        };

        let key = raw_key.trim();
        if key.is_empty() {
            return Err(ClientError::invalid_argument_for_command(
                &format!("Field `{assignment}` has an empty key."),
                Some(command),
            ));
        }

        fields.insert(key.to_string(), parse_field_value(raw_value));
    }
    Ok(fields)
}

fn parse_field_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}
