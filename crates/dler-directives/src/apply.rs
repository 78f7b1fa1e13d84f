//! Whole-file application of per-line outcomes.

use crate::evaluator::{DirectiveWarning, EvaluationContext, evaluate};
use crate::parser::DIRECTIVE_TOKEN;

/// Cheap whole-file test run before any per-line parsing.
pub fn has_directive_token(content: &str) -> bool {
    content.contains(DIRECTIVE_TOKEN)
}

/// The effect of applying all directives of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEdit {
    Unchanged,
    Rewrite(String),
    Remove,
}

/// A warning tied to the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWarning {
    pub line: usize,
    pub warning: DirectiveWarning,
}

/// Result of [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub edit: FileEdit,
    /// Lines replaced or removed. Zero when the file is removed.
    pub changed_lines: usize,
    pub warnings: Vec<LineWarning>,
}

/// Apply every directive in `content` for the given context.
///
/// Lines are split on `\n`; a trailing `\r` is kept out of evaluation and
/// reattached to emitted lines. A `remove-file` directive stops evaluation
/// at that line.
///
/// # Example
/// ```
/// use dler_directives::{EvaluationContext, FileEdit, apply};
///
/// let content = "a\nb // <dler-remove-line>\nc\n";
/// let result = apply(content, &EvaluationContext::new("dist-npm/bin/x.js"));
/// assert_eq!(result.edit, FileEdit::Rewrite("a\nc\n".to_string()));
/// ```
pub fn apply(content: &str, context: &EvaluationContext<'_>) -> Application {
    if !has_directive_token(content) {
        return Application {
            edit: FileEdit::Unchanged,
            changed_lines: 0,
            warnings: Vec::new(),
        };
    }

    let mut output: Vec<String> = Vec::new();
    let mut warnings = Vec::new();
    let mut changed_lines = 0;

    for (idx, raw) in content.split('\n').enumerate() {
        let (line, cr) = match raw.strip_suffix('\r') {
            Some(stripped) => (stripped, "\r"),
            None => (raw, ""),
        };

        let outcome = evaluate(line, context);
        if let Some(warning) = outcome.warning.clone() {
            warnings.push(LineWarning {
                line: idx + 1,
                warning,
            });
        }

        if outcome.remove_file {
            return Application {
                edit: FileEdit::Remove,
                changed_lines: 0,
                warnings,
            };
        }

        if outcome.remove_line {
            changed_lines += 1;
            continue;
        }

        match outcome.replacement_line {
            Some(replacement) => {
                if replacement != line {
                    changed_lines += 1;
                }
                output.push(format!("{replacement}{cr}"));
            }
            None => output.push(raw.to_string()),
        }
    }

    let rewritten = output.join("\n");
    let edit = if rewritten == content {
        FileEdit::Unchanged
    } else {
        FileEdit::Rewrite(rewritten)
    };

    Application {
        edit,
        changed_lines,
        warnings,
    }
}
