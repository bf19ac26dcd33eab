use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

pub(crate) const REPORT_HELP_COMMAND: &str = "channelboard report upload --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `channelboard {cmd} --help` for usage."),
            None => "Run `channelboard --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_report(message: &str) -> Self {
        Self::new(
            "invalid_report",
            message,
            vec![
                "Export the report again as CSV with a header row.".to_string(),
                format!("Run `{REPORT_HELP_COMMAND}` to review the expected columns."),
            ],
        )
    }

    pub fn report_not_found(report_id: &str) -> Self {
        Self::new(
            "report_not_found",
            &format!("Report id `{report_id}` was not found."),
            vec![
                "Run `channelboard report list` to find a valid report id.".to_string(),
                "Retry with `channelboard report show <report_id>`.".to_string(),
            ],
        )
        .with_data(json!({
            "report_id": report_id,
        }))
    }

    pub fn document_not_found(collection: &str, doc_id: &str) -> Self {
        Self::new(
            "document_not_found",
            &format!("Record `{doc_id}` was not found in collection `{collection}`."),
            vec![format!(
                "Run `channelboard record list {collection}` to find a valid record id."
            )],
        )
        .with_data(json!({
            "collection": collection,
            "doc_id": doc_id,
        }))
    }

    pub fn object_unavailable(url: &str, detail: &str) -> Self {
        Self::new(
            "object_unavailable",
            &format!("Stored object `{url}` could not be read: {detail}"),
            vec![
                "Upload the file again; the stored copy may have been moved or deleted."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "url": url,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize the board store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `CHANNELBOARD_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Board database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Board database appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite board file or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Board migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Board store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    /// Storage and serialization failures are not fixable by changing the
    /// command line, so the CLI reports them with a distinct exit code.
    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "store_init_permission_denied"
                    | "store_locked"
                    | "store_corrupt"
                    | "migration_failed"
                    | "store_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
