use std::fs;
use std::io::{IsTerminal, Read};

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) kind: SourceKind,
    pub(crate) source_ref: Option<String>,
    pub(crate) content: String,
}

/// Picks report text from a file path or piped stdin. `-` forces stdin.
pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<String>,
    command: &str,
) -> ClientResult<ResolvedSource> {
    let stdin_body = read_stdin(stdin_override)?;

    if let Some(path_value) = path {
        if path_value == "-" {
            if let Some(stdin_value) = stdin_body {
                return Ok(stdin_source(stdin_value));
            }
            return Err(ClientError::invalid_argument_for_command(
                "Path `-` means stdin input, but stdin was empty. Pipe CSV input or pass a file path.",
                Some(command),
            ));
        }

        if stdin_body.is_some() {
            return Err(ClientError::invalid_argument_for_command(
                "Both stdin and file input were provided. Pass exactly one source: either a file path or piped stdin.",
                Some(command),
            ));
        }

        let content = read_text_file(&path_value, command)?;
        return Ok(ResolvedSource {
            kind: SourceKind::File,
            source_ref: Some(path_value),
            content,
        });
    }

    if let Some(stdin_value) = stdin_body {
        return Ok(stdin_source(stdin_value));
    }

    Err(ClientError::invalid_argument_for_command(
        "No CSV source provided. Pass a file path or pipe input via stdin.",
        Some(command),
    ))
}

pub(crate) fn read_text_file(path: &str, command: &str) -> ClientResult<String> {
    fs::read_to_string(path).map_err(|error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Could not read file `{path}`: {error}"),
            vec![
                "Verify the path exists and is a readable UTF-8 CSV file.".to_string(),
                format!("Run `channelboard {command} --help` for usage."),
            ],
        )
    })
}

fn stdin_source(content: String) -> ResolvedSource {
    ResolvedSource {
        kind: SourceKind::Stdin,
        source_ref: None,
        content,
    }
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    let buffer = match stdin_override {
        Some(value) => value,
        None => {
            if std::io::stdin().is_terminal() {
                return Ok(None);
            }
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| {
                    ClientError::invalid_argument_with_recovery(
                        &format!("Could not read stdin: {error}"),
                        vec![
                            "Retry with an explicit file path argument.".to_string(),
                            "Or rerun with valid stdin content.".to_string(),
                        ],
                    )
                })?;
            buffer
        }
    };

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}
