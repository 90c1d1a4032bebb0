//! Colored terminal output honoring `--quiet` and `--verbose`.

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes user-facing messages.
///
/// Informational output goes to stdout and is suppressed by `quiet`;
/// warnings and errors go to stderr and are always shown.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    choice: ColorChoice,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let choice = if std::env::var_os("NO_COLOR").is_some() {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Self {
            verbose,
            quiet,
            choice,
        }
    }

    /// Informational message, unless quiet.
    pub fn info(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.tagged(StandardStream::stdout(self.choice), Color::Cyan, "info", message)
    }

    /// Only shown with `--verbose`.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.choice);
        out.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(out, "  {message}")?;
        out.reset()
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.tagged(StandardStream::stderr(self.choice), Color::Yellow, "warning", message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.tagged(StandardStream::stderr(self.choice), Color::Red, "error", message)
    }

    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.tagged(StandardStream::stdout(self.choice), Color::Green, "✓", message)
    }

    /// One step of a longer operation.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.tagged(StandardStream::stdout(self.choice), Color::Blue, "→", message)
    }

    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.choice);
        out.set_color(ColorSpec::new().set_bold(true).set_underline(true))?;
        write!(out, "{title}")?;
        out.reset()?;
        writeln!(out)
    }

    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut out = StandardStream::stdout(self.choice);
        writeln!(out, "    {message}")
    }

    /// Indented line on stderr, for detail under an error.
    pub fn error_detail(&self, message: &str) -> io::Result<()> {
        let mut out = StandardStream::stderr(self.choice);
        writeln!(out, "    {message}")
    }

    fn tagged(
        &self,
        mut out: StandardStream,
        color: Color,
        tag: &str,
        message: &str,
    ) -> io::Result<()> {
        out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(out, "{tag}")?;
        out.reset()?;
        writeln!(out, " {message}")
    }
}
