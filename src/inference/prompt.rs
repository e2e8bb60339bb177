use chrono::{DateTime, Utc};

/// Upper bound on the directory listing injected into every prompt.
pub const MAX_LISTING_BYTES: usize = 8 * 1024;
/// Upper bound on the error text handed to an explanation request.
pub const MAX_ERROR_BYTES: usize = 16 * 1024;

const TRUNCATED: &str = "... (truncated)";

pub const LISTING_COMMAND: &str = if cfg!(windows) { "dir /a" } else { "ls -a" };

const CHAT_REMINDER: &str = "Remember to provide a concise summary focusing only on the key points.";

const EXPLAIN_INSTRUCTION: &str = "I got the following error in my terminal. Please explain what it means and suggest how to fix it. Be concise and focus on the key points:";

pub fn context_block(now: DateTime<Utc>, listing: &str) -> String {
    format!(
        "<info>
Date: {date}
Directory Listing ({cmd}):
{listing}

IMPORTANT INSTRUCTIONS:
- Provide concise, summarized responses
- Focus on the key points only
- Use bullet points for clarity when appropriate
- Keep explanations brief and to the point
- Avoid unnecessary details and verbose explanations
</info>",
        date = now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        cmd = LISTING_COMMAND,
        listing = keep_head(listing, MAX_LISTING_BYTES),
    )
}

pub fn chat_prompt(context: &str, message: &str) -> String {
    format!("{context}\n\n{message}\n\n{CHAT_REMINDER}")
}

pub fn explain_prompt(context: &str, error_text: &str) -> String {
    format!(
        "{context}\n\n{EXPLAIN_INSTRUCTION}\n\n{}",
        keep_tail(error_text, MAX_ERROR_BYTES)
    )
}

/// Keeps at most `max` bytes from the start, cut on a char boundary.
pub fn keep_head(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n{TRUNCATED}", &text[..end])
}

/// Keeps at most `max` bytes from the end, cut on a char boundary.
pub fn keep_tail(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("{TRUNCATED}\n{}", &text[start..])
}
