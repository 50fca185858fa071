//! Terminal output for the rcml CLI.
//!
//! Cargo-style status lines with a right-aligned coloured verb. Status
//! output goes to stderr; stdout only carries recipe text and JSON.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::error::RcmlError;
use crate::validation::{Diagnostic, Severity};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width for the right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware status printer.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    /// Colour is enabled when stderr is a terminal.
    pub fn new() -> Self {
        Self::with_color(io::stderr().is_terminal())
    }

    /// Create a printer with colour forced on or off.
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Print a status line with a green bold verb.
    ///
    /// e.g. "     Checked 12 recipes"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    /// Print an informational line with a cyan bold verb.
    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    /// Print a warning line with a yellow bold verb.
    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    /// Print an error line with a red bold verb.
    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    /// Report a file that failed to load.
    pub fn file_error(&self, path: &Path, error: &RcmlError) {
        self.error("error", &format!("{}: {}", display_path(path), error));
        if let Some(help) = error_help(error) {
            self.detail(&format!("help: {}", help));
        }
    }

    /// Report a validation finding for a file.
    pub fn diagnostic(&self, path: &Path, diagnostic: &Diagnostic) {
        let message = format!("{}: {}", display_path(path), self.describe(diagnostic));
        match diagnostic.severity {
            Severity::Error => self.error("error", &message),
            Severity::Warning => self.warning("warning", &message),
        }
        if let Some(help) = &diagnostic.help {
            self.detail(&format!("help: {}", help));
        }
    }

    /// Format a string as dim/grey.
    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// Format a string in cyan.
    pub fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn describe(&self, diagnostic: &Diagnostic) -> String {
        let mut text = String::new();
        if let Some(field) = &diagnostic.field {
            text.push_str(&self.cyan(field));
            text.push_str(": ");
        }
        text.push_str(&diagnostic.message);
        text.push(' ');
        text.push_str(&self.dim(&format!("[{}]", diagnostic.code)));
        text
    }

    fn detail(&self, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{:VERB_WIDTH$} {}", "", self.dim(message));
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        if self.color {
            let _ = writeln!(stderr, "{BOLD}{color}{verb:>VERB_WIDTH$}{RESET} {message}");
        } else {
            let _ = writeln!(stderr, "{verb:>VERB_WIDTH$} {message}");
        }
    }
}

fn error_help(error: &RcmlError) -> Option<String> {
    use miette::Diagnostic as _;
    error.help().map(|h| h.to_string())
}

/// `plural(1, "recipe", "recipes")` → "1 recipe".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// A path relative to the working directory when possible.
pub fn display_path(path: &Path) -> String {
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(relative) = path.strip_prefix(&cwd) {
            let s = relative.display().to_string();
            if s.is_empty() {
                return ".".to_string();
            }
            return s;
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "recipe", "recipes"), "1 recipe");
        assert_eq!(plural(0, "recipe", "recipes"), "0 recipes");
        assert_eq!(plural(3, "warning", "warnings"), "3 warnings");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/cookbook/soup.recipe");
        assert_eq!(display_path(p), "/nonexistent/cookbook/soup.recipe");
    }

    #[test]
    fn test_plain_formatting_without_color() {
        let printer = Printer::with_color(false);
        assert_eq!(printer.dim("Soup"), "Soup");

        let d = Diagnostic::warning("rcml::validate::empty-group", "Part 'Sauce' has no lines")
            .in_field("ingredients");
        assert_eq!(
            printer.describe(&d),
            "ingredients: Part 'Sauce' has no lines [rcml::validate::empty-group]"
        );
    }

    #[test]
    fn test_error_help() {
        let err = RcmlError::InvalidEnvironment {
            line: 3,
            name: "banana".to_string(),
        };
        assert!(error_help(&err).is_some());
        assert!(error_help(&RcmlError::MissingField { field: "name".to_string() }).is_none());
    }
}
