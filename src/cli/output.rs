//! Terminal output for the CI log.
//!
//! Everything except errors goes to stdout, so condaci's own messages stay in
//! order with the tool output streamed through [`OutputManager::println`].
//! Errors go to stderr and ignore `--quiet`.

use std::io::{self, Write};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Leading marker of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Command,
    Success,
    Warning,
    Error,
    Detail,
}

impl Tag {
    fn marker(self) -> &'static str {
        match self {
            Tag::Command => ">",
            Tag::Success => "✓",
            Tag::Warning => "⚠",
            Tag::Error => "✗",
            Tag::Detail => "→",
        }
    }

    fn color(self) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match self {
            Tag::Command => spec.set_fg(Some(Color::Cyan)).set_bold(true),
            Tag::Success => spec.set_fg(Some(Color::Green)).set_bold(true),
            Tag::Warning => spec.set_fg(Some(Color::Yellow)).set_bold(true),
            Tag::Error => spec.set_fg(Some(Color::Red)).set_bold(true),
            Tag::Detail => spec.set_fg(Some(Color::Blue)),
        };
        spec
    }
}

/// Writes progress, echoed commands and streamed tool output
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
    quiet: bool,
}

// BufferWriter owns a handle and is not Clone
impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    fn tagged(writer: &BufferWriter, tag: Tag, message: &str) -> io::Result<()> {
        let mut buffer = writer.buffer();
        buffer.set_color(&tag.color())?;
        write!(buffer, "{}", tag.marker())?;
        buffer.reset()?;
        writeln!(buffer, " {}", message)?;
        writer.print(&buffer)
    }

    fn stdout_tagged(&self, tag: Tag, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        Self::tagged(&self.stdout, tag, message)
    }

    /// Echo an external command line (already redacted) before it runs
    pub fn command(&self, line: &str) -> io::Result<()> {
        self.stdout_tagged(Tag::Command, line)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.stdout_tagged(Tag::Success, message)
    }

    /// Print a warning
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.stdout_tagged(Tag::Warning, message)
    }

    /// Print an error to stderr, even in quiet mode
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        if Self::tagged(&stderr, Tag::Error, message).is_err() {
            eprintln!("error: {}", message);
        }
    }

    /// Print a detail shown only with `--verbose`
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        self.stdout_tagged(Tag::Detail, message)
    }

    /// Start a step of the CI log
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut buffer = self.stdout.buffer();
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        buffer.set_color(&spec)?;
        writeln!(buffer, "\n==> {}", title)?;
        buffer.reset()?;
        self.stdout.print(&buffer)
    }

    /// Print a line nested under the previous message
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.println(&format!("    {}", message))
    }

    /// Print a plain line; also the sink for streamed tool output
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut buffer = self.stdout.buffer();
        writeln!(buffer, "{}", message)?;
        self.stdout.print(&buffer)
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_have_distinct_markers() {
        let tags = [Tag::Command, Tag::Success, Tag::Warning, Tag::Error, Tag::Detail];
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a.marker(), b.marker());
            }
        }
    }

    #[test]
    fn test_quiet_suppresses_stdout() {
        let output = OutputManager::new(true, true);
        assert!(output.is_quiet());
        assert!(output.println("tool line").is_ok());
        assert!(output.section("Building").is_ok());
        let cloned = output.clone();
        assert!(cloned.is_verbose() && cloned.is_quiet());
    }
}
