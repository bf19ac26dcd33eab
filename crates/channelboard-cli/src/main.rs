mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use channelboard_client::ClientError;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout_text;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

const ROOT_HELP: &str = "Channelboard - channel revenue reports and board records

Usage:
  channelboard <command>

Start here:
  channelboard analyze <path>
  channelboard report upload --help
  channelboard record collections
";

const TOP_LEVEL_HELP: &str = "Channelboard - channel revenue reports and board records

USAGE: channelboard <command>

Analyze a revenue export right away:
  channelboard analyze <path>                             Summary, first transactions, top titles, monthly revenue
  cat export.csv | channelboard analyze -                 Same, reading stdin

Keep monthly store reports:
  1. channelboard report upload --help                    Expected columns and workflow
  2. channelboard report upload <path> --year Y --month M Store a report for a month
  3. channelboard report list [--year Y] [--month M]      Find uploaded reports
  4. channelboard report show <report_id>                 Installs, uninstalls, gross and net revenue
     channelboard report remove <report_id>               Delete a report and its file

Manage board records (leagues, teams, matches, ...):
  channelboard record collections                         Collections and record counts
  channelboard record add <collection> key=value ...      Add a record (--image <path> to attach an image)
  channelboard record list <collection>                   List records, oldest first
  channelboard record update <collection> <id> key=value  Merge fields (--unset <key>, --image <path>)
  channelboard record delete <collection> <id>            Delete a record

Every data command accepts --json. Data lives in $CHANNELBOARD_HOME (default ~/.channelboard).
Run `channelboard <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    init_logger(cli.log_level);
    debug!(command = ?cli.command, "dispatching");

    let mode = output::mode_for_command(&cli.command);
    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// parseable.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "{}={level},channelboard_client={level}",
            env!("CARGO_CRATE_NAME")
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout_text(&text).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout_text(&err.to_string()).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines; the
/// recovery steps carry that guidance instead.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Subcommand path for the help hint, e.g. `report upload`.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let words = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    let hint = match words.as_slice() {
        ["analyze", ..] => "analyze",
        ["report", sub @ ("upload" | "list" | "show" | "remove"), ..] => {
            return Some(format!("report {sub}"));
        }
        ["report", ..] => "report",
        ["record", sub @ ("add" | "list" | "update" | "delete" | "collections"), ..] => {
            return Some(format!("record {sub}"));
        }
        ["record", ..] => "record",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_internal() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
