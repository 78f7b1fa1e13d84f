//! Directive grammar and evaluation for the dler directive engine.
//!
//! Source files carry single-line directives inside `//` comments:
//!
//! ```text
//! export const v = "dev"; // <dler-replace-line-to `export const v = "1.2.3";` if 'current file path starts with dist-npm'>
//! import "./debug"; // <dler-remove-line>
//! // <dler-remove-file>
//! ```
//!
//! This crate is pure: it never touches disk and carries no state between
//! lines. [`evaluate`] maps one line plus an [`EvaluationContext`] to an
//! [`Outcome`]; [`apply`] folds that over a whole file.
//!
//! # Directive kinds
//!
//! | Directive | Effect |
//! |---|---|
//! | `remove-file` | the whole file is deleted, later lines are not evaluated |
//! | `remove-line` | the line is dropped |
//! | `remove-comment` | the line is dropped only if it starts with `//` |
//! | `replace-line-to` | the line is replaced, optionally under a condition |

pub mod apply;
pub mod condition;
pub mod evaluator;
pub mod parser;

pub use apply::{Application, FileEdit, LineWarning, apply, has_directive_token};
pub use condition::{Condition, default_condition, parse_condition};
pub use evaluator::{DirectiveWarning, EvaluationContext, Outcome, evaluate};
pub use parser::{COMMENT_MARKER, DIRECTIVE_TOKEN, Directive, ParsedLine, parse_line};
