use owo_colors::OwoColorize;
use skiff_core::ToolInvocation;
use std::io::{self, Write};

const BANNER: &str = "Chat with Claude (use 'ctrl+C' to exit)";

/// Terminal output of a session.
///
/// Implementations write the human-visible transcript; diagnostics go to
/// `tracing` instead.
pub trait Renderer: Send {
    fn banner(&mut self) -> io::Result<()>;

    /// Prompt shown before each human read.
    fn prompt(&mut self) -> io::Result<()>;

    /// One text block of a model turn.
    fn model_text(&mut self, text: &str) -> io::Result<()>;

    /// Trace line for a tool that is about to run.
    fn tool_trace(&mut self, invocation: &ToolInvocation) -> io::Result<()>;

    fn warning(&mut self, message: &str) -> io::Result<()>;
}

/// Renders to a writer, optionally with ANSI colors.
pub struct AnsiRenderer<W> {
    out: W,
    color: bool,
}

impl AnsiRenderer<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> AnsiRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&mut self, label: &str, paint: fn(&str) -> String) -> io::Result<()> {
        if self.color {
            write!(self.out, "{}: ", paint(label))
        } else {
            write!(self.out, "{label}: ")
        }
    }
}

impl<W: Write + Send> Renderer for AnsiRenderer<W> {
    fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "{BANNER}")?;
        self.out.flush()
    }

    fn prompt(&mut self) -> io::Result<()> {
        self.label("You", |s| s.bright_blue().to_string())?;
        self.out.flush()
    }

    fn model_text(&mut self, text: &str) -> io::Result<()> {
        self.label("Claude", |s| s.bright_yellow().to_string())?;
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    fn tool_trace(&mut self, invocation: &ToolInvocation) -> io::Result<()> {
        self.label("tool", |s| s.bright_green().to_string())?;
        writeln!(self.out, "{}({})", invocation.name, invocation.input)?;
        self.out.flush()
    }

    fn warning(&mut self, message: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}", message.bright_red())?;
        } else {
            writeln!(self.out, "{message}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rendered(color: bool, f: impl FnOnce(&mut AnsiRenderer<Vec<u8>>)) -> String {
        let mut renderer = AnsiRenderer::new(Vec::new(), color);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn plain_output() {
        let output = rendered(false, |r| {
            r.banner().unwrap();
            r.prompt().unwrap();
            r.model_text("Hello!").unwrap();
            r.tool_trace(&ToolInvocation::new("t", "read_file", json!({"path": "a.txt"})))
                .unwrap();
        });

        assert_eq!(
            output,
            "Chat with Claude (use 'ctrl+C' to exit)\nYou: Claude: Hello!\ntool: read_file({\"path\":\"a.txt\"})\n"
        );
    }

    #[test]
    fn colored_labels() {
        let output = rendered(true, |r| {
            r.prompt().unwrap();
            r.model_text("hi").unwrap();
            r.tool_trace(&ToolInvocation::new("t", "list_files", json!({})))
                .unwrap();
        });

        assert!(output.starts_with("\u{1b}[94mYou\u{1b}[39m: "));
        assert!(output.contains("\u{1b}[93mClaude\u{1b}[39m: hi\n"));
        assert!(output.contains("\u{1b}[92mtool\u{1b}[39m: list_files({})\n"));
    }
}
