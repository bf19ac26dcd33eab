use crate::cli::{Commands, RecordCommand, ReportCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Analyze { json, .. } => *json,
        Commands::Report { command } => match command {
            ReportCommand::Upload { json, .. }
            | ReportCommand::List { json, .. }
            | ReportCommand::Show { json, .. }
            | ReportCommand::Remove { json, .. } => *json,
        },
        Commands::Record { command } => match command {
            RecordCommand::Add { json, .. }
            | RecordCommand::List { json, .. }
            | RecordCommand::Update { json, .. }
            | RecordCommand::Delete { json, .. }
            | RecordCommand::Collections { json } => *json,
        },
    };
    OutputMode::from_flag(json)
}
