use inksac::prelude::*;

/// Terminal colors for everything the session prints.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    color_support: ColorSupport,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    /// A palette that never emits escape codes.
    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, Color::Red, false)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, Color::Green, false)
    }

    pub fn banner(&self, text: &str) -> String {
        self.paint(text, Color::Green, true)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, Color::Yellow, false)
    }

    pub fn info(&self, text: &str) -> String {
        self.paint(text, Color::Blue, false)
    }

    pub fn hint(&self, text: &str) -> String {
        self.paint(text, Color::RGB(128, 128, 128), false)
    }

    fn paint(&self, text: &str, color: Color, bold: bool) -> String {
        if matches!(self.color_support, ColorSupport::NoColor) {
            return text.to_string();
        }

        let style = if bold {
            Style::builder().foreground(color).bold().build()
        } else {
            Style::builder().foreground(color).build()
        };

        text.style(style).to_string()
    }
}
