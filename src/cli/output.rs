//! Terminal output for the tasklist CLI
//!
//! Status lines carry a marker glyph when colors are on and a bracketed tag
//! otherwise, so logs captured without a TTY stay greppable.

use owo_colors::{OwoColorize, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Ok,
    Info,
    Warn,
    Error,
    Skip,
}

impl Level {
    fn marker(self) -> &'static str {
        match self {
            Level::Ok => "✓",
            Level::Info => "•",
            Level::Warn => "⚠",
            Level::Error => "✗",
            Level::Skip => "○",
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Skip => "SKIPPED",
        }
    }

    fn style(self) -> Style {
        match self {
            Level::Ok => Style::new().green(),
            Level::Info => Style::new().blue(),
            Level::Warn | Level::Skip => Style::new().yellow(),
            Level::Error => Style::new().red(),
        }
    }
}

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.colored {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn status_line(&self, level: Level, message: &str) -> String {
        if self.colored {
            let style = level.style();
            format!(
                "  {} {}",
                level.marker().style(style.bold()),
                message.style(style)
            )
        } else {
            format!("  [{}] {}", level.tag(), message)
        }
    }

    /// Print the startup banner
    pub fn banner(&self) {
        println!(
            "\n   {} {}\n",
            self.paint("tasklist-server", Style::new().bright_cyan().bold()),
            self.paint(
                &format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::new().dimmed()
            )
        );
    }

    pub fn success(&self, message: &str) {
        println!("{}", self.status_line(Level::Ok, message));
    }

    pub fn info(&self, message: &str) {
        println!("{}", self.status_line(Level::Info, message));
    }

    pub fn warning(&self, message: &str) {
        println!("{}", self.status_line(Level::Warn, message));
    }

    /// Errors go to stderr.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.status_line(Level::Error, message));
    }

    /// Report a file or directory written by `init`
    pub fn created(&self, kind: &str, path: &str) {
        println!(
            "{}",
            self.status_line(Level::Ok, &format!("created {} {}", kind, path))
        );
    }

    /// Report a file or directory left untouched
    pub fn skipped(&self, path: &str, reason: &str) {
        println!(
            "{}",
            self.status_line(Level::Skip, &format!("{} ({})", path, reason))
        );
    }

    pub fn header(&self, title: &str) {
        println!(
            "\n  {}",
            self.paint(title, Style::new().bright_white().bold().underline())
        );
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!(
            "    {}: {}",
            self.paint(key, Style::new().dimmed()),
            self.paint(value, Style::new().bright_white())
        );
    }

    pub fn hint(&self, message: &str) {
        println!("\n  {}", self.paint(message, Style::new().dimmed().italic()));
    }

    /// Print a shell command the user can run next
    pub fn command(&self, cmd: &str) {
        println!(
            "     {}",
            self.paint(&format!("$ {}", cmd), Style::new().bright_cyan())
        );
    }

    pub fn complete(&self, message: &str) {
        println!("\n  {}", self.paint(message, Style::new().bright_green().bold()));
    }

    pub fn newline(&self) {
        println!();
    }
}
