mod command;

use std::borrow::Cow;

use rustyline::{
    completion::{Completer, Pair},
    highlight::{CmdKind, Highlighter},
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use self::command::BuiltinCompleter;
use crate::highlight::Palette;

/// Line-editor helper: completes built-in command names in the first word.
#[derive(Clone)]
pub struct ReplHelper {
    builtin_completer: BuiltinCompleter,
    palette: Palette,
}

impl Default for ReplHelper {
    fn default() -> Self {
        Self::new(Palette::new())
    }
}

impl ReplHelper {
    pub fn new(palette: Palette) -> Self {
        ReplHelper {
            builtin_completer: BuiltinCompleter::new(),
            palette,
        }
    }
}

impl Helper for ReplHelper {}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(self.palette.hint(hint))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        false
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Validator for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_up_to_cursor = &line[..pos];
        let word = line_up_to_cursor.trim_start();

        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let start = pos - word.len();
        Ok((start, self.builtin_completer.complete_command(word)))
    }
}
