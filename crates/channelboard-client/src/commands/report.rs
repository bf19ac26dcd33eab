use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::analytics::{ReportVariant, aggregate, parse_rows};
use crate::commands::common::{load_setup, validate_month, validate_year};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    ReportFileFields, ReportFileRow, ReportListData, ReportListFilters, ReportRemoveData,
    ReportShowData, ReportUploadData, SummaryData,
};
use crate::input::read_text_file;
use crate::state::now_timestamp;
use crate::store::{Document, DocumentStore, ObjectStore};
use crate::{ClientError, ClientResult};

/// Collection holding one document per uploaded report file.
pub const REPORT_COLLECTION: &str = "csv_files";

const UPLOAD_COMMAND: &str = "report upload";
const LIST_COMMAND: &str = "report list";
const SHOW_COMMAND: &str = "report show";
const REMOVE_COMMAND: &str = "report remove";

#[derive(Debug, Default)]
pub struct ReportUploadOptions<'a> {
    pub path: String,
    pub year: i32,
    pub month: u32,
    pub name: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ReportListOptions<'a> {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ReportShowOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ReportRemoveOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn upload(
    path: String,
    year: i32,
    month: u32,
    name: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    upload_with_options(ReportUploadOptions {
        path,
        year,
        month,
        name,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn upload_with_options(options: ReportUploadOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let year = validate_year(options.year, UPLOAD_COMMAND)?;
    let month = validate_month(options.month, UPLOAD_COMMAND)?;
    let name = resolve_display_name(&options.path, options.name)?;

    let content = read_text_file(&options.path, UPLOAD_COMMAND)?;
    let rows = parse_rows(&content)?;

    let setup = load_setup(options.home_override)?;
    let objects = ObjectStore::new(&setup.objects_dir);
    let stored = objects.upload(Path::new(&options.path), &name)?;

    let fields = ReportFileFields {
        name,
        selected_year: year,
        selected_month: month,
        url: stored.url.clone(),
        size_bytes: stored.size_bytes,
        uploaded_at: now_timestamp(),
    };

    let added = encode_report_fields(&fields).and_then(|body| {
        DocumentStore::open(&setup).and_then(|store| store.add(REPORT_COLLECTION, body))
    });
    let document = match added {
        Ok(document) => document,
        Err(error) => {
            objects.remove(&stored.url);
            return Err(error);
        }
    };

    info!(report_id = %document.id, year, month, "report uploaded");
    success(
        UPLOAD_COMMAND,
        ReportUploadData {
            report: ReportFileRow {
                report_id: document.id,
                fields,
            },
            rows_read: rows.len() as i64,
        },
    )
}

pub fn list(year: Option<i32>, month: Option<u32>) -> ClientResult<SuccessEnvelope> {
    list_with_options(ReportListOptions {
        year,
        month,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: ReportListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let filters = ReportListFilters {
        year: options
            .year
            .map(|year| validate_year(year, LIST_COMMAND))
            .transpose()?,
        month: options
            .month
            .map(|month| validate_month(month, LIST_COMMAND))
            .transpose()?,
    };

    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;

    let mut reports = Vec::new();
    for document in store.list(REPORT_COLLECTION)? {
        let doc_id = document.id.clone();
        let Ok(report) = decode_report(document) else {
            warn!(doc_id = %doc_id, "skipping malformed report document");
            continue;
        };
        let year_matches = filters
            .year
            .is_none_or(|year| report.fields.selected_year == year);
        let month_matches = filters
            .month
            .is_none_or(|month| report.fields.selected_month == month);
        if year_matches && month_matches {
            reports.push(report);
        }
    }

    success(LIST_COMMAND, ReportListData { filters, reports })
}

pub fn show(report_id: &str) -> ClientResult<SuccessEnvelope> {
    show_with_options(
        report_id,
        ReportShowOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn show_with_options(
    report_id: &str,
    options: ReportShowOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;
    let document = load_report_document(&store, report_id)?;
    let report = decode_report(document).map_err(|_| not_a_report(report_id))?;

    let objects = ObjectStore::new(&setup.objects_dir);
    let content = objects.fetch_text(&report.fields.url)?;
    let rows = parse_rows(&content)?;
    let result = aggregate(&rows, ReportVariant::Store);

    success(
        SHOW_COMMAND,
        ReportShowData {
            report,
            summary: SummaryData::from(&result.summary),
            top_transactions: result.top_transactions,
        },
    )
}

pub fn remove(report_id: &str) -> ClientResult<SuccessEnvelope> {
    remove_with_options(
        report_id,
        ReportRemoveOptions {
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn remove_with_options(
    report_id: &str,
    options: ReportRemoveOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let store = DocumentStore::open(&setup)?;
    let document = load_report_document(&store, report_id)?;
    let url = document
        .fields
        .get("url")
        .and_then(Value::as_str)
        .map(str::to_string);

    store.delete(REPORT_COLLECTION, report_id)?;

    let object_removed = match url {
        Some(url) => ObjectStore::new(&setup.objects_dir).remove(&url),
        None => false,
    };

    info!(report_id, object_removed, "report removed");
    success(
        REMOVE_COMMAND,
        ReportRemoveData {
            report_id: report_id.to_string(),
            object_removed,
        },
    )
}

fn resolve_display_name(path: &str, name: Option<String>) -> ClientResult<String> {
    let candidate = match name {
        Some(value) => value.trim().to_string(),
        None => Path::new(path)
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .unwrap_or_default(),
    };

    if candidate.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Report name cannot be empty. Pass `--name <name>`.",
            Some(UPLOAD_COMMAND),
        ));
    }
    Ok(candidate)
}

fn load_report_document(store: &DocumentStore, report_id: &str) -> ClientResult<Document> {
    store
        .get(REPORT_COLLECTION, report_id)
        .map_err(|error| match error.code.as_str() {
            "document_not_found" => ClientError::report_not_found(report_id),
            _ => error,
        })
}

fn decode_report(document: Document) -> Result<ReportFileRow, serde_json::Error> {
    let fields = serde_json::from_value::<ReportFileFields>(Value::Object(document.fields))?;
    Ok(ReportFileRow {
        report_id: document.id,
        fields,
    })
}

fn encode_report_fields(fields: &ReportFileFields) -> ClientResult<Map<String, Value>> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ClientError::internal_serialization(
            "report fields did not serialize to an object",
        )),
        Err(error) => Err(ClientError::internal_serialization(&error.to_string())),
    }
}

fn not_a_report(report_id: &str) -> ClientError {
    ClientError::invalid_report(&format!(
        "Record `{report_id}` in `{REPORT_COLLECTION}` is missing report file fields."
    ))
}
