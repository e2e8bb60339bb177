use std::io::{self, Write};

use rustyline::{config::Configurer, error::ReadlineError, history::FileHistory, Editor};
use tracing::{info, warn};

mod controller;

pub use controller::{Controller, Flow};

use crate::{
    core::{config::DataPaths, state::Session},
    error::SessionError,
    highlight::Palette,
    inference::HttpTransport,
    input::ReplHelper,
    process::{signal, ShellRunner},
};

pub struct Shell {
    editor: Editor<ReplHelper, FileHistory>,
    controller: Controller<ShellRunner, HttpTransport>,
    palette: Palette,
}

impl Shell {
    pub fn new() -> Result<Self, SessionError> {
        let palette = Palette::new();
        print_banner(&palette);

        let paths = DataPaths::new()?;
        let session = Session::load(&paths)?;
        info!(data_dir = %paths.root.display(), "session loaded");

        let mut editor = Editor::<ReplHelper, FileHistory>::new()?;
        editor.set_helper(Some(ReplHelper::new(palette)));
        editor.set_auto_add_history(true);

        signal::install_interrupt_handler(palette)?;

        let controller = Controller::new(session, ShellRunner::new(), HttpTransport::new()?, palette);

        Ok(Shell {
            editor,
            controller,
            palette,
        })
    }

    /// Reads one line at a time until `exit`, Ctrl-C, or Ctrl-D.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            let prompt = self.controller.prompt();
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if self.controller.step(&line, &mut io::stdout()) == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    warn!(error = %e, "line editor failed");
                    eprintln!("{}", self.palette.error(&format!("Error: {e}")));
                    break;
                }
            }
        }

        if let Err(e) = writeln!(io::stdout(), "{}", self.palette.success("Goodbye!")) {
            warn!(error = %e, "farewell not printed");
        }
        Ok(())
    }
}

fn print_banner(palette: &Palette) {
    println!("{}", palette.banner("=== LLMCode ==="));
    for line in [
        "Terminal coding support tool with Ollama integration",
        "Type \"exit\" or press Ctrl+C to quit",
        "Type \"help\" to see available commands",
        "Type \"!\" to toggle between Shell and Chat mode",
    ] {
        println!("{}", palette.success(line));
    }
    println!("{}", palette.banner("============="));
}
