use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

pub const REPORT_UPLOAD_AFTER_HELP: &str = "\
Expected columns (header names are case-sensitive):
  Transaction Type      `purchase` counts as an install, `cancellation` as an uninstall
  Transaction Amount    money value; `1,200.50` style separators are accepted
  Developer Rev Share   optional; summed into net revenue
  Transaction Date      copied into the transaction list as written

Other columns are ignored. Unreadable amounts count as 0.

What to do next:
  1. channelboard report upload <path> --year 2024 --month 3
  2. channelboard report list --year 2024
  3. channelboard report show <report_id>
";

pub const ANALYZE_AFTER_HELP: &str = "\
<path> is a local CSV file. Use `-` to read stdin explicitly.
Example: cat payouts.csv | channelboard analyze -

Besides the summary, analyze ranks the ten most frequent `Video Title`
values and totals `Transaction Amount` per `Transaction Date` month.
";

pub const RECORD_AFTER_HELP: &str = "\
Fields are `key=value` pairs. Values that read as JSON scalars keep their
type (`wins=4`, `active=true`, `coach=null`, `code=\"007\"`); everything
else is stored as text.

Examples:
  channelboard record add teams name=Hawks wins=3 --image logo.png
  channelboard record update teams <record_id> wins=4 --unset coach
";

#[derive(Debug, Parser)]
#[command(
    name = "channelboard",
    version,
    about = "Channel revenue reports and board records",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log verbosity on stderr. `RUST_LOG` overrides it when set.
    #[arg(
        long,
        global = true,
        env = "CHANNELBOARD_LOG_LEVEL",
        default_value_t = LevelFilter::WARN
    )]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize a revenue CSV without storing it
    #[command(after_help = ANALYZE_AFTER_HELP)]
    Analyze {
        /// CSV file path, or `-` for stdin
        path: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Upload and inspect monthly store reports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    /// Manage records in named collections
    Record {
        #[command(subcommand)]
        command: RecordCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Store a report CSV for a reporting month
    #[command(after_help = REPORT_UPLOAD_AFTER_HELP)]
    Upload {
        path: String,
        /// Reporting year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Reporting month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List uploaded reports
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Summarize an uploaded report
    Show {
        report_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Delete an uploaded report and its stored file
    Remove {
        report_id: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Add a record to a collection
    #[command(after_help = RECORD_AFTER_HELP)]
    Add {
        collection: String,
        /// `key=value` fields
        fields: Vec<String>,
        /// Image file to store alongside the record
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List records in a collection, oldest first
    List {
        collection: String,
        #[arg(long)]
        json: bool,
    },
    /// Merge fields into a record
    #[command(after_help = RECORD_AFTER_HELP)]
    Update {
        collection: String,
        record_id: String,
        /// `key=value` fields to set
        fields: Vec<String>,
        /// Field to remove (repeatable)
        #[arg(long = "unset", value_name = "KEY")]
        unset: Vec<String>,
        /// Replacement image file
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a record and its stored image
    Delete {
        collection: String,
        record_id: String,
        #[arg(long)]
        json: bool,
    },
    /// List collections with record counts
    Collections {
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::{Commands, RecordCommand, ReportCommand, parse_from};

    #[test]
    fn parses_analyze_with_stdin_dash() {
        let parsed = parse_from(["channelboard", "analyze", "-", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            match cli.command {
                Commands::Analyze { path, json } => {
                    assert_eq!(path.as_deref(), Some("-"));
                    assert!(json);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn parses_report_upload_period_flags() {
        let parsed = parse_from([
            "channelboard",
            "report",
            "upload",
            "march.csv",
            "--year",
            "2024",
            "--month",
            "3",
            "--name",
            "March",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            match cli.command {
                Commands::Report {
                    command:
                        ReportCommand::Upload {
                            path,
                            year,
                            month,
                            name,
                            json,
                        },
                } => {
                    assert_eq!(path, "march.csv");
                    assert_eq!(year, Some(2024));
                    assert_eq!(month, Some(3));
                    assert_eq!(name.as_deref(), Some("March"));
                    assert!(!json);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_numeric_month() {
        let parsed = parse_from(["channelboard", "report", "list", "--month", "march"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_record_update_fields_and_unsets() {
        let parsed = parse_from([
            "channelboard",
            "record",
            "update",
            "teams",
            "doc_1",
            "wins=4",
            "name=Hawks",
            "--unset",
            "coach",
            "--unset",
            "logo",
        ]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            match cli.command {
                Commands::Record {
                    command:
                        RecordCommand::Update {
                            collection,
                            record_id,
                            fields,
                            unset,
                            image,
                            ..
                        },
                } => {
                    assert_eq!(collection, "teams");
                    assert_eq!(record_id, "doc_1");
                    assert_eq!(fields, vec!["wins=4", "name=Hawks"]);
                    assert_eq!(unset, vec!["coach", "logo"]);
                    assert_eq!(image, None);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[test]
    fn log_level_is_global_and_defaults_to_warn() {
        let default = parse_from(["channelboard", "record", "collections"]);
        assert!(default.is_ok());
        if let Ok(cli) = default {
            assert_eq!(cli.log_level, LevelFilter::WARN);
        }

        let explicit = parse_from(["channelboard", "record", "collections", "--log-level", "debug"]);
        assert!(explicit.is_ok());
        if let Ok(cli) = explicit {
            assert_eq!(cli.log_level, LevelFilter::DEBUG);
        }
    }
}
