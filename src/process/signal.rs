use std::io::Write;

use crate::highlight::Palette;

/// Ctrl-C while a command or request is in flight ends the session cleanly.
///
/// At the prompt the line editor reads Ctrl-C itself, so this only fires
/// while the session is blocked on a child process or the network.
pub fn install_interrupt_handler(palette: Palette) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        let mut stdout = std::io::stdout();
        let _ = writeln!(stdout, "\n{}", palette.success("Goodbye!"));
        let _ = stdout.flush();
        std::process::exit(0);
    })
}
