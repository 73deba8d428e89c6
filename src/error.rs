use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

/// Error taxonomy of the K interpreter. Undefined, Eval, and Unsupported
/// all render under the generic `Error` diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Type,
    TypeInference,
    Scope,
    UnknownCommand,
    Undefined,
    Eval,
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct KError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl KError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
        }
    }

    pub fn syntax_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Syntax, span, message)
    }

    pub fn type_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Type, span, message)
    }

    pub fn type_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::Type, span, message, help)
    }

    pub fn inference_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::TypeInference, span, message)
    }

    pub fn scope_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Scope, span, message)
    }

    pub fn unknown_command(span: Span, message: String) -> Self {
        Self::new(ErrorKind::UnknownCommand, span, message)
    }

    pub fn undefined_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Undefined, span, message)
    }

    pub fn eval_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Eval, span, message)
    }

    pub fn eval_error_with_help(span: Span, message: String, help: String) -> Self {
        Self::new_with_help(ErrorKind::Eval, span, message, help)
    }

    pub fn unsupported_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Unsupported, span, message)
    }

    /// Shift the span by `base` bytes. Expression errors carry spans relative
    /// to the expression substring; the line dispatcher rebases them onto the
    /// full script so reports point at the real source location.
    pub fn offset(mut self, base: usize) -> Self {
        self.span.start += base;
        self.span.end += base;
        self
    }

    /// Diagnostic category as it appears in line-tagged output.
    pub fn category(&self) -> &'static str {
        match self.kind {
            ErrorKind::Syntax => "Syntax Error",
            ErrorKind::Type => "Type Error",
            ErrorKind::TypeInference => "Type Inference Error",
            ErrorKind::Scope => "Scope Error",
            ErrorKind::UnknownCommand => "Unknown command",
            ErrorKind::Undefined | ErrorKind::Eval | ErrorKind::Unsupported => "Error",
        }
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::Syntax | ErrorKind::UnknownCommand => Color::Yellow,
            ErrorKind::Type | ErrorKind::TypeInference => Color::Magenta,
            ErrorKind::Scope => Color::Cyan,
            ErrorKind::Undefined | ErrorKind::Eval | ErrorKind::Unsupported => Color::Red,
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", self.category().fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        // Add help note if available
        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
            .unwrap();
    }
}

impl fmt::Display for KError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for KError {}
