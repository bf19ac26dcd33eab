mod error_text;
mod format;
mod json;
mod mode;
mod records_text;
mod report_text;

use std::io;

use channelboard_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout_line;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout_line(&body)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout_line(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "analyze" => report_text::render_analyze(&success.data),
        "report upload" => report_text::render_report_upload(&success.data),
        "report list" => report_text::render_report_list(&success.data),
        "report show" => report_text::render_report_show(&success.data),
        "report remove" => report_text::render_report_remove(&success.data),
        "record add" | "record update" => {
            records_text::render_record(&success.command, &success.data)
        }
        "record list" => records_text::render_record_list(&success.data),
        "record delete" => records_text::render_record_delete(&success.data),
        "record collections" => records_text::render_collections(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
