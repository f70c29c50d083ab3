//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::{SyntaxError, SyntaxErrorKind};

impl SyntaxError {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let range: std::ops::Range<usize> = self.span.into();
        let report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(format!("{}", self))
            .with_label(
                Label::new((filename, range))
                    .with_message(label(self.kind))
                    .with_color(Color::Red),
            )
            .with_help(help(self.kind));
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

fn label(kind: SyntaxErrorKind) -> &'static str {
    match kind {
        SyntaxErrorKind::NamedKeyword => "not a valid name",
        SyntaxErrorKind::Syntax => "unexpected token",
        SyntaxErrorKind::DuplicateKeyword => "specified again here",
        SyntaxErrorKind::EmptyContext => "block opened here",
        SyntaxErrorKind::InvalidParameterSyntax => "invalid parameter",
        SyntaxErrorKind::NoParameters => "parameters expected before this",
        SyntaxErrorKind::TooManyParameters => "too many parameters",
        SyntaxErrorKind::InvalidParameter => "invalid parameter",
        SyntaxErrorKind::UnrecognisedKeyword => "unrecognised keyword",
        SyntaxErrorKind::UnexpectedEof => "input ends here",
        SyntaxErrorKind::InvalidToken => "cannot be tokenized",
    }
}

fn help(kind: SyntaxErrorKind) -> &'static str {
    match kind {
        SyntaxErrorKind::NamedKeyword => "names must be plain identifiers, as in `rule my_rule:`",
        SyntaxErrorKind::Syntax => "a keyword header is `keyword [name]:` followed by a line break",
        SyntaxErrorKind::DuplicateKeyword => "each keyword may appear only once per block",
        SyntaxErrorKind::EmptyContext => "add at least one keyword to the block body",
        SyntaxErrorKind::InvalidParameterSyntax => {
            "keys must be identifiers, and keywords must not be indented into a parameter list"
        }
        SyntaxErrorKind::NoParameters => "give the keyword at least one value",
        SyntaxErrorKind::TooManyParameters => "this keyword takes a single value",
        SyntaxErrorKind::InvalidParameter => "this keyword takes a positional value, not `key = value`",
        SyntaxErrorKind::UnrecognisedKeyword => "check the spelling and the indentation of the keyword",
        SyntaxErrorKind::UnexpectedEof => "the input was cut short",
        SyntaxErrorKind::InvalidToken => {
            "close every string on its line and dedent to an enclosing level"
        }
    }
}
