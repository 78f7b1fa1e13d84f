//! Distribution target specification and validation
//!
//! Targets are written as `dist-npm`, `dist-jsr`, `dist-libs` (every
//! library) or `dist-libs/<lib>`. Validation happens before any I/O;
//! expansion into concrete registries happens later, once libraries are
//! known from disk.

use std::collections::HashSet;

use crate::error::TargetError;

pub const DIST_NPM: &str = "dist-npm";
pub const DIST_JSR: &str = "dist-jsr";
pub const DIST_LIBS: &str = "dist-libs";

/// A validated distribution target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistTarget {
    Npm,
    Jsr,
    /// Every library found under `dist-libs/`
    AllLibraries,
    Library(String),
}

impl DistTarget {
    /// Parse a single target string without cross-target checks.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        match raw {
            DIST_NPM => Ok(Self::Npm),
            DIST_JSR => Ok(Self::Jsr),
            DIST_LIBS => Ok(Self::AllLibraries),
            _ => {
                let lib = raw
                    .strip_prefix(DIST_LIBS)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .ok_or_else(|| TargetError::InvalidTarget(raw.to_string()))?;
                if lib.is_empty() {
                    return Err(TargetError::EmptyLibraryName(raw.to_string()));
                }
                if lib.contains(['/', '\\']) || lib == "." || lib == ".." {
                    return Err(TargetError::InvalidTarget(raw.to_string()));
                }
                Ok(Self::Library(lib.to_string()))
            }
        }
    }

    /// Root directory of a flat target, relative to the project root.
    pub fn flat_root(&self) -> Option<&'static str> {
        match self {
            Self::Npm => Some("dist-npm/bin"),
            Self::Jsr => Some("dist-jsr/bin"),
            Self::AllLibraries | Self::Library(_) => None,
        }
    }
}

impl std::fmt::Display for DistTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Npm => write!(f, "{DIST_NPM}"),
            Self::Jsr => write!(f, "{DIST_JSR}"),
            Self::AllLibraries => write!(f, "{DIST_LIBS}"),
            Self::Library(lib) => write!(f, "{DIST_LIBS}/{lib}"),
        }
    }
}

/// Validate a list of target strings.
///
/// Rejects unknown prefixes, `dist-libs` combined with `dist-libs/<lib>`,
/// duplicate targets and duplicate libraries. Order is preserved.
///
/// # Example
/// ```
/// use dler_core::target::{DistTarget, validate_targets};
///
/// let targets = validate_targets(&["dist-npm", "dist-libs/sdk"]).unwrap();
/// assert_eq!(targets, vec![DistTarget::Npm, DistTarget::Library("sdk".into())]);
/// assert!(validate_targets(&["dist-libs", "dist-libs/sdk"]).is_err());
/// ```
pub fn validate_targets<S: AsRef<str>>(raw: &[S]) -> Result<Vec<DistTarget>, TargetError> {
    let mut targets = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();

    for item in raw {
        let item = item.as_ref();
        let target = DistTarget::parse(item)?;
        if !seen.insert(target.clone()) {
            return Err(match target {
                DistTarget::Library(lib) => TargetError::DuplicateLibrary(lib),
                _ => TargetError::DuplicateTarget(item.to_string()),
            });
        }
        targets.push(target);
    }

    if targets.contains(&DistTarget::AllLibraries)
        && let Some(specific) = targets
            .iter()
            .find(|t| matches!(t, DistTarget::Library(_)))
    {
        return Err(TargetError::Conflict {
            wildcard: DIST_LIBS.to_string(),
            specific: specific.to_string(),
        });
    }

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips() {
        for raw in ["dist-npm", "dist-jsr", "dist-libs", "dist-libs/sdk"] {
            assert_eq!(DistTarget::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_nested_library_name_is_invalid() {
        assert_eq!(
            DistTarget::parse("dist-libs/a/b"),
            Err(TargetError::InvalidTarget("dist-libs/a/b".to_string()))
        );
    }

    #[test]
    fn test_lookalike_prefix_is_invalid() {
        assert!(matches!(
            DistTarget::parse("dist-libsx"),
            Err(TargetError::InvalidTarget(_))
        ));
    }
}
