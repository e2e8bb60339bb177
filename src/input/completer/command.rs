use rustyline::completion::Pair;

/// Words the session treats as built-in commands rather than shell input.
pub const BUILTIN_COMMANDS: &[&str] = &[
    "!",
    "clear",
    "config",
    "config:model ",
    "exit",
    "explain",
    "help",
    "history",
];

#[derive(Clone, Default)]
pub struct BuiltinCompleter;

impl BuiltinCompleter {
    pub fn new() -> Self {
        Self
    }

    pub fn complete_command(&self, input: &str) -> Vec<Pair> {
        BUILTIN_COMMANDS
            .iter()
            .filter(|cmd| !input.is_empty() && cmd.starts_with(input))
            .map(|cmd| Pair {
                display: cmd.trim_end().to_string(),
                replacement: cmd.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matches_builtins() {
        let completer = BuiltinCompleter::new();
        let names: Vec<String> = completer
            .complete_command("con")
            .into_iter()
            .map(|p| p.replacement)
            .collect();

        assert_eq!(names, vec!["config".to_string(), "config:model ".to_string()]);
    }

    #[test]
    fn test_empty_input_offers_nothing() {
        assert!(BuiltinCompleter::new().complete_command("").is_empty());
    }
}
