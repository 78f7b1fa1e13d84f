//! Directive parsing.
//!
//! Recognizes directives of the form:
//! ```text
//! // <dler-NAME BODY>
//! // @ts-expect-error <dler-NAME BODY>
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Cheap whole-file marker: a file without this substring has no directives.
pub const DIRECTIVE_TOKEN: &str = "<dler-";

/// Line comment marker that must precede a directive token.
pub const COMMENT_MARKER: &str = "//";

/// A recognized directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Replace the whole line, optionally only when `condition` holds.
    ReplaceLineTo {
        replacement: String,
        condition: Option<String>,
        else_replacement: Option<String>,
    },
    /// Drop this line.
    RemoveLine,
    /// Delete the whole file.
    RemoveFile,
    /// Drop this line if the line itself is a comment.
    RemoveComment,
}

impl Directive {
    /// The name as written after `<dler-`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReplaceLineTo { .. } => "replace-line-to",
            Self::RemoveLine => "remove-line",
            Self::RemoveFile => "remove-file",
            Self::RemoveComment => "remove-comment",
        }
    }
}

/// Result of scanning one line for a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Recognized(Directive),
    /// A directive token whose name is not known.
    UnknownName(String),
    /// A known name whose body does not follow its grammar.
    Malformed { name: String, body: String },
    NoDirective,
}

/// `//`, an optional `@ts-expect-error`/`@ts-ignore` annotation, then the
/// token. The body runs to the last `>` on the line.
static DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//\s*(?:@ts-(?:expect-error|ignore)\b[^<]*?)?<dler-([^\s>]+)(.*)>")
        .expect("Invalid directive regex")
});

/// `` `replacement` [if 'condition'] [else 'alternate'] ``
static REPLACE_BODY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*`([^`]*)`(?:\s+if\s+'([^']*)')?(?:\s+else\s+'([^']*)')?\s*$")
        .expect("Invalid replace-line-to body regex")
});

/// Parse a single line for a directive.
///
/// # Example
/// ```
/// use dler_directives::{Directive, ParsedLine, parse_line};
///
/// let parsed = parse_line("import './dev'; // <dler-remove-line>");
/// assert_eq!(parsed, ParsedLine::Recognized(Directive::RemoveLine));
/// assert_eq!(parse_line("const a = 1;"), ParsedLine::NoDirective);
/// ```
pub fn parse_line(line: &str) -> ParsedLine {
    if !line.contains(DIRECTIVE_TOKEN) {
        return ParsedLine::NoDirective;
    }

    let Some(caps) = DIRECTIVE_REGEX.captures(line) else {
        return ParsedLine::NoDirective;
    };
    let name = caps.get(1).map_or("", |m| m.as_str());
    let body = caps.get(2).map_or("", |m| m.as_str());

    match name {
        "remove-line" => ParsedLine::Recognized(Directive::RemoveLine),
        "remove-file" => ParsedLine::Recognized(Directive::RemoveFile),
        "remove-comment" => ParsedLine::Recognized(Directive::RemoveComment),
        "replace-line-to" => parse_replace_body(body),
        other => ParsedLine::UnknownName(other.to_string()),
    }
}

fn parse_replace_body(body: &str) -> ParsedLine {
    let Some(caps) = REPLACE_BODY_REGEX.captures(body) else {
        return ParsedLine::Malformed {
            name: "replace-line-to".to_string(),
            body: body.trim().to_string(),
        };
    };

    let capture = |idx: usize| caps.get(idx).map(|m| m.as_str().to_string());
    ParsedLine::Recognized(Directive::ReplaceLineTo {
        replacement: capture(1).unwrap_or_default(),
        condition: capture(2),
        else_replacement: capture(3),
    })
}
