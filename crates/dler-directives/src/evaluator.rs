//! Per-line directive evaluation.

use crate::condition::{default_condition, parse_condition};
use crate::parser::{COMMENT_MARKER, Directive, ParsedLine, parse_line};

/// The single datum a directive may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationContext<'a> {
    /// Project-relative path of the distribution file being processed.
    pub dist_file_path: &'a str,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(dist_file_path: &'a str) -> Self {
        Self { dist_file_path }
    }
}

/// Non-fatal problem found while evaluating a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveWarning {
    UnknownDirective { name: String },
    UnsupportedCondition { condition: String },
    MalformedDirective { name: String, body: String },
}

impl std::fmt::Display for DirectiveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDirective { name } => write!(f, "unknown directive <dler-{name}>"),
            Self::UnsupportedCondition { condition } => {
                write!(f, "unsupported condition '{condition}', treated as false")
            }
            Self::MalformedDirective { name, body } => {
                write!(f, "malformed <dler-{name}> body: {body}")
            }
        }
    }
}

/// What to do with one line.
///
/// The default outcome keeps the line untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub replacement_line: Option<String>,
    pub remove_line: bool,
    pub remove_file: bool,
    pub warning: Option<DirectiveWarning>,
}

impl Outcome {
    fn keep() -> Self {
        Self::default()
    }

    fn replace(line: String) -> Self {
        Self {
            replacement_line: Some(line),
            ..Self::default()
        }
    }

    fn remove_line() -> Self {
        Self {
            remove_line: true,
            ..Self::default()
        }
    }

    fn remove_file() -> Self {
        Self {
            remove_file: true,
            ..Self::default()
        }
    }

    fn warn(warning: DirectiveWarning) -> Self {
        Self {
            warning: Some(warning),
            ..Self::default()
        }
    }

    /// Whether applying this outcome leaves the line as it was.
    pub fn is_noop(&self) -> bool {
        self.replacement_line.is_none() && !self.remove_line && !self.remove_file
    }
}

/// Evaluate one line against the context.
///
/// # Example
/// ```
/// use dler_directives::{EvaluationContext, evaluate};
///
/// let line = r#"export const v = "dev"; // <dler-replace-line-to `export const v = "1.2.3";` if 'current file path starts with dist-npm'>"#;
/// let npm = evaluate(line, &EvaluationContext::new("dist-npm/bin/a.js"));
/// assert_eq!(npm.replacement_line.as_deref(), Some(r#"export const v = "1.2.3";"#));
///
/// let jsr = evaluate(line, &EvaluationContext::new("dist-jsr/bin/a.ts"));
/// assert!(jsr.is_noop());
/// ```
pub fn evaluate(line: &str, context: &EvaluationContext<'_>) -> Outcome {
    match parse_line(line) {
        ParsedLine::NoDirective => Outcome::keep(),
        ParsedLine::UnknownName(name) => Outcome::warn(DirectiveWarning::UnknownDirective { name }),
        ParsedLine::Malformed { name, body } => {
            Outcome::warn(DirectiveWarning::MalformedDirective { name, body })
        }
        ParsedLine::Recognized(directive) => apply_directive(line, directive, context),
    }
}

fn apply_directive(line: &str, directive: Directive, context: &EvaluationContext<'_>) -> Outcome {
    match directive {
        Directive::RemoveFile => Outcome::remove_file(),
        Directive::RemoveLine => Outcome::remove_line(),
        Directive::RemoveComment => {
            if line.trim().starts_with(COMMENT_MARKER) {
                Outcome::remove_line()
            } else {
                Outcome::keep()
            }
        }
        Directive::ReplaceLineTo {
            replacement,
            condition,
            else_replacement,
        } => {
            let (holds, warning) = match condition {
                None => (default_condition().holds(context.dist_file_path), None),
                Some(text) => match parse_condition(&text) {
                    Some(cond) => (cond.holds(context.dist_file_path), None),
                    None => (
                        false,
                        Some(DirectiveWarning::UnsupportedCondition { condition: text }),
                    ),
                },
            };

            let mut outcome = if holds {
                Outcome::replace(replacement)
            } else if let Some(alt) = else_replacement {
                Outcome::replace(alt)
            } else {
                Outcome::keep()
            };
            outcome.warning = warning;
            outcome
        }
    }
}
