use channelboard_client::ClientError;

use super::format::key_value_rows;

pub fn render_error(error: &ClientError) -> String {
    let mut lines = vec![if error.is_internal() {
        "The board store could not complete this command.".to_string()
    } else {
        "The command could not run as given.".to_string()
    }];
    lines.push(String::new());
    lines.extend(key_value_rows(
        &[
            ("Error:", error.code.clone()),
            ("Details:", error.message.clone()),
        ],
        2,
    ));
    lines.push(String::new());
    lines.push("What to do next:".to_string());

    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}
