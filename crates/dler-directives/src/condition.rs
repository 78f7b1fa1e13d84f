//! Condition language for `replace-line-to`.
//!
//! The only supported form is
//! `current file path starts with <prefix> [or <prefix>]*`.

use regex::Regex;
use std::sync::LazyLock;

static STARTS_WITH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*current file path starts with\s+(\S.*?)\s*$")
        .expect("Invalid condition regex")
});

static OR_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+or\s+").expect("Invalid or-separator regex"));

/// A parsed `replace-line-to` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// True when the distribution file path starts with any of the prefixes.
    PathStartsWith(Vec<String>),
}

impl Condition {
    /// Evaluate against a distribution file path.
    ///
    /// The path is slash-normalized first; prefixes are matched as plain
    /// string prefixes.
    pub fn holds(&self, dist_file_path: &str) -> bool {
        let normalized = dist_file_path.replace('\\', "/");
        match self {
            Self::PathStartsWith(prefixes) => prefixes
                .iter()
                .any(|prefix| normalized.starts_with(prefix.as_str())),
        }
    }
}

/// The condition used when a `replace-line-to` directive has none.
pub fn default_condition() -> Condition {
    Condition::PathStartsWith(vec!["dist-jsr".to_string(), "dist-npm".to_string()])
}

/// Parse condition text. Returns `None` for unsupported conditions.
///
/// # Example
/// ```
/// use dler_directives::{Condition, parse_condition};
///
/// let cond = parse_condition("current file path starts with dist-npm or dist-jsr").unwrap();
/// assert_eq!(
///     cond,
///     Condition::PathStartsWith(vec!["dist-npm".into(), "dist-jsr".into()])
/// );
/// assert!(parse_condition("file is big").is_none());
/// ```
pub fn parse_condition(text: &str) -> Option<Condition> {
    let caps = STARTS_WITH_REGEX.captures(text)?;
    let list = caps.get(1)?.as_str();

    let prefixes: Vec<String> = OR_SEPARATOR_REGEX
        .split(list)
        .map(|prefix| prefix.trim().replace('\\', "/"))
        .collect();

    if prefixes.iter().any(|prefix| prefix.is_empty() || prefix.contains(char::is_whitespace)) {
        return None;
    }
    Some(Condition::PathStartsWith(prefixes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_condition_matches_flat_dists() {
        let cond = default_condition();
        assert!(cond.holds("dist-npm/bin/a.js"));
        assert!(cond.holds("dist-jsr/bin/a.ts"));
        assert!(!cond.holds("dist-libs/sdk/npm/bin/a.js"));
    }

    #[test]
    fn test_backslash_paths_are_normalized() {
        let cond = parse_condition("current file path starts with dist-libs/sdk").unwrap();
        assert!(cond.holds("dist-libs\\sdk\\npm\\bin\\a.js"));
    }

    #[test]
    fn test_prefix_with_spaces_is_unsupported() {
        assert!(parse_condition("current file path starts with dist npm").is_none());
    }

    #[test]
    fn test_dangling_or_is_unsupported() {
        assert!(parse_condition("current file path starts with dist-npm or").is_none());
    }
}
