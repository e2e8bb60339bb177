use chrono::{DateTime, Local, Utc};

use crate::highlight::Palette;
use crate::input::{ChatTurn, CommandRecord, Role};

const PREVIEW_CHARS: usize = 50;

/// Newest record whose command failed.
pub fn last_failed(records: &[CommandRecord]) -> Option<&CommandRecord> {
    records.iter().rev().find(|record| record.has_error)
}

/// `N. ✓ command [time]`, numbered from 1.
pub fn format_command_entry(index: usize, record: &CommandRecord, palette: &Palette) -> String {
    let status = if record.has_error {
        palette.error("✖")
    } else {
        palette.success("✓")
    };

    format!(
        "{} {} {} {}",
        palette.warning(&format!("{}.", index + 1)),
        status,
        palette.info(&record.command),
        palette.hint(&format!("[{}]", format_timestamp(record.timestamp)))
    )
}

/// Two turns share one number: a user message and its reply.
pub fn format_chat_entry(index: usize, turn: &ChatTurn, palette: &Palette) -> String {
    let role = format!("[{}]", turn.role.label());
    let role = match turn.role {
        Role::User => palette.info(&role),
        Role::Assistant => palette.success(&role),
    };

    format!(
        "{} {} {} {}",
        palette.warning(&format!("{}.", index / 2 + 1)),
        role,
        preview(&turn.content),
        palette.hint(&format!("[{}]", format_timestamp(turn.timestamp)))
    )
}

/// First 50 characters, with `...` when anything was cut.
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();

    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
