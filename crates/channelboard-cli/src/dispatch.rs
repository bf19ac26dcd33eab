use channelboard_client::commands::{analyze, records, report};
use channelboard_client::{ClientResult, SuccessEnvelope};
use chrono::{Datelike, Local};
use tracing::debug;

use crate::cli::{Cli, Commands, RecordCommand, ReportCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Analyze { path, .. } => analyze::run(path.clone()),
        Commands::Report { command } => dispatch_report(command),
        Commands::Record { command } => dispatch_record(command),
    }
}

fn dispatch_report(command: &ReportCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        ReportCommand::Upload {
            path,
            year,
            month,
            name,
            ..
        } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or_else(|| today.year());
            let month = month.unwrap_or_else(|| today.month());
            debug!(year, month, "resolved report period");
            report::upload(path.clone(), year, month, name.clone())
        }
        ReportCommand::List { year, month, .. } => report::list(*year, *month),
        ReportCommand::Show { report_id, .. } => report::show(report_id),
        ReportCommand::Remove { report_id, .. } => report::remove(report_id),
    }
}

fn dispatch_record(command: &RecordCommand) -> ClientResult<SuccessEnvelope> {
    match command {
        RecordCommand::Add {
            collection,
            fields,
            image,
            ..
        } => records::add(collection, fields.clone(), image.clone()),
        RecordCommand::List { collection, .. } => records::list(collection),
        RecordCommand::Update {
            collection,
            record_id,
            fields,
            unset,
            image,
            ..
        } => records::update(
            collection,
            record_id,
            fields.clone(),
            unset.clone(),
            image.clone(),
        ),
        RecordCommand::Delete {
            collection,
            record_id,
            ..
        } => records::delete(collection, record_id),
        RecordCommand::Collections { .. } => records::collections(),
    }
}
