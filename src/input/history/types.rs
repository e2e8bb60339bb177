use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of one shell command run from the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRecord {
    pub command: String,
    pub timestamp: DateTime<Utc>,
    #[serde(deserialize_with = "exit_code_or_signal")]
    pub exit_code: i32,
    pub output: String,
    pub error: String,
    /// Set once at creation: non-zero exit or anything written to stderr.
    pub has_error: bool,
}

/// Exit code recorded when the process was terminated by a signal.
pub const SIGNALED_EXIT_CODE: i32 = -1;

impl CommandRecord {
    pub fn new(
        command: impl Into<String>,
        exit_code: i32,
        output: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let error = error.into();
        let has_error = exit_code != 0 || !error.is_empty();

        CommandRecord {
            command: command.into(),
            timestamp: Utc::now(),
            exit_code,
            output: output.into(),
            error,
            has_error,
        }
    }
}

// Older history files store `null` for processes killed by a signal.
fn exit_code_or_signal<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(SIGNALED_EXIT_CODE))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// One message of the chat transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatTurn {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
