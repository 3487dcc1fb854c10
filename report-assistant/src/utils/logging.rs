// Logging utilities
// Structured logging with JSON and human-readable formats

use log::Level;
use serde_json::json;

/// Mask sensitive data in logs
pub fn mask_sensitive(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }

    let visible = 4;
    let start: String = chars[..visible].iter().collect();
    let end: String = chars[chars.len() - visible..].iter().collect();

    format!("{}...{}", start, end)
}

/// Mask a SQL Server style connection string (`Key=Value;...`).
/// Passwords are replaced entirely, user ids partially.
pub fn mask_connection_string(conn_str: &str) -> String {
    conn_str
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(mask_connection_part)
        .collect::<Vec<_>>()
        .join(";")
}

fn mask_connection_part(part: &str) -> String {
    let Some((key, value)) = part.split_once('=') else {
        return part.to_string();
    };
    let key = key.trim();

    match key.to_ascii_lowercase().replace([' ', '_'], "").as_str() {
        "password" | "pwd" => format!("{}=***", key),
        "userid" | "user" | "username" | "uid" => {
            format!("{}={}", key, mask_sensitive(value.trim()))
        }
        _ => part.to_string(),
    }
}

/// `operator@plant.example` -> `o***@plant.example`. The domain stays visible.
pub fn mask_email(address: &str) -> String {
    match address.trim().split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

pub fn mask_recipients(recipients: &[String]) -> String {
    recipients
        .iter()
        .map(|r| mask_email(r))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split `[PHASE: ...]` and `[STEP: ...]` tags out of a log message.
/// Returns `(phase, step, message without the tags)`.
pub fn parse_log_metadata(message: &str) -> (Option<String>, Option<String>, String) {
    let (phase, rest) = take_tag(message, "[PHASE:");
    let (step, rest) = take_tag(&rest, "[STEP:");
    (phase, step, rest)
}

/// First `open ... ]` tag in `message`: its trimmed value and the message without it.
fn take_tag(message: &str, open: &str) -> (Option<String>, String) {
    let Some(start) = message.find(open) else {
        return (None, message.to_string());
    };
    let Some(len) = message[start..].find(']') else {
        return (None, message.to_string());
    };

    let value = message[start + open.len()..start + len].trim().to_string();
    let rest = format!("{} {}", &message[..start], &message[start + len + 1..])
        .trim()
        .to_string();
    (Some(value), rest)
}

/// Format log entry as JSON for structured logging
pub fn format_json_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_entry = json!({
        "timestamp": timestamp,
        "level": level.as_str(),
        "target": target,
        "message": message,
    });

    if let Some(phase) = phase {
        log_entry["phase"] = json!(phase);
    }

    if let Some(step) = step {
        log_entry["step"] = json!(step);
    }

    serde_json::to_string(&log_entry).unwrap_or_else(|_| "{}".to_string())
}

/// Format log entry as human-readable text
pub fn format_human_readable_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_line = format!("[{}] [{}]", timestamp, level.as_str());

    if let Some(phase) = phase {
        log_line.push_str(&format!(" [PHASE: {}]", phase));
    }

    if let Some(step) = step {
        log_line.push_str(&format!(" [STEP: {}]", step));
    }

    log_line.push_str(&format!(" [{}] {}", target, message));
    log_line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_strings_hide_passwords_and_user_ids() {
        let masked = mask_connection_string(
            "Server=SCADA01;Database=WinCC;User Id=plant_operator;Password=hunter2hunter2;",
        );
        assert_eq!(
            masked,
            "Server=SCADA01;Database=WinCC;User Id=plan...ator;Password=***"
        );

        for key in ["Password", "Pwd", "password", "PWD"] {
            let masked = mask_connection_string(&format!("{}=secret123", key));
            assert_eq!(masked, format!("{}=***", key));
        }
        assert_eq!(mask_connection_string("  "), "");
    }

    #[test]
    fn mask_sensitive_short_and_long_values() {
        assert_eq!(mask_sensitive("abc"), "***");
        assert_eq!(mask_sensitive("12345678"), "***");
        assert_eq!(mask_sensitive("abcdefghijklmnop"), "abcd...mnop");
        // multibyte input must not split a character
        assert_eq!(mask_sensitive("ÄÖÜäöüßéèê"), "ÄÖÜä...ßéèê");
    }

    #[test]
    fn recipients_keep_only_first_letter_of_local_part() {
        assert_eq!(mask_email("operator@plant.example"), "o***@plant.example");
        assert_eq!(mask_email("not-an-email"), "***");
        assert_eq!(
            mask_recipients(&["a@b.com".to_string(), "cd@e.org".to_string()]),
            "a***@b.com, c***@e.org"
        );
    }

    #[test]
    fn metadata_tags_are_extracted_from_message() {
        let (phase, step, msg) =
            parse_log_metadata("[PHASE: wizard] [STEP: next] Moved to step 2");
        assert_eq!(phase.as_deref(), Some("wizard"));
        assert_eq!(step.as_deref(), Some("next"));
        assert_eq!(msg, "Moved to step 2");

        let (phase, step, msg) = parse_log_metadata("plain message");
        assert!(phase.is_none() && step.is_none());
        assert_eq!(msg, "plain message");
    }

    #[test]
    fn formatted_lines_carry_phase_and_step() {
        let json = format_json_log(
            "2024-01-01T00:00:00Z",
            Level::Info,
            "report_assistant",
            "hello",
            Some("auth"),
            None,
        );
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["level"], "INFO");
        assert_eq!(v["phase"], "auth");
        assert!(v.get("step").is_none());

        let text = format_human_readable_log(
            "ts",
            Level::Warn,
            "t",
            "m",
            Some("p"),
            Some("s"),
        );
        assert_eq!(text, "[ts] [WARN] [PHASE: p] [STEP: s] [t] m");
    }
}
