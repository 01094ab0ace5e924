//! GitHub Actions versioning
//!
//! Action tags are often partial (`v4`, `v4.1`) and float to the newest
//! matching release, so tags of different precision have to be ordered
//! against each other:
//! - both fully specified: strict semver ordering
//! - otherwise: compare the components both sides wrote, most significant
//!   first; if those all tie, the less precise tag sorts greater
//!
//! The last rule means `"1"` sorts after `"1.0.1"`, and `"1.0"` after
//! `"1.0.1"`. It is kept exactly as upstream behaves until upstream
//! clarifies whether a floating tag should rank above its releases.
//!
//! Everything besides stability, ordering and compatibility is delegated
//! to the [`StrictEngine`].

pub mod parser;

use std::cmp::Ordering;

use tracing::debug;

use crate::versioning::api::{NewValueConfig, VersioningApi};
use crate::versioning::error::VersioningError;
use crate::versioning::semver_coerced::SemverCoerced;
use crate::versioning::strict::StrictEngine;

pub use parser::{Component, ParsedVersion, Precision, parse, parse_with};

pub const ID: &str = "github-actions";
pub const DISPLAY_NAME: &str = "Github Actions";
pub const URLS: &[&str] = &[];
pub const SUPPORTS_RANGES: bool = false;

/// Whether `version` parses and carries no trailing qualifier
pub fn is_stable(version: &str) -> bool {
    parse(version).is_some_and(|parsed| parsed.is_stable())
}

/// Order components as written, treating an absent component as greater
/// than any present one at the same position.
fn compare_raw(a: &[Option<Component>; 3], b: &[Option<Component>; 3]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match (x, y) {
            (Some(x), Some(y)) if x == y => continue,
            (Some(x), Some(y)) => return x.cmp(y),
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
        }
    }
    Ordering::Equal
}

/// Versioning for GitHub Actions release tags
#[derive(Debug, Clone, Default)]
pub struct GitHubActionsVersioning<E = SemverCoerced> {
    engine: E,
}

impl GitHubActionsVersioning {
    pub fn new() -> Self {
        Self::with_engine(SemverCoerced)
    }
}

impl<E: StrictEngine> GitHubActionsVersioning<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    fn parse(&self, input: &str) -> Option<ParsedVersion> {
        parse_with(input, |v| self.engine.coerce(v))
    }

    fn parse_required(&self, input: &str) -> Result<ParsedVersion, VersioningError> {
        self.parse(input)
            .ok_or_else(|| VersioningError::InvalidVersion(input.to_string()))
    }
}

impl<E: StrictEngine> VersioningApi for GitHubActionsVersioning<E> {
    fn id(&self) -> &'static str {
        ID
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn urls(&self) -> &'static [&'static str] {
        URLS
    }

    fn supports_ranges(&self) -> bool {
        SUPPORTS_RANGES
    }

    fn equals(&self, version: &str, other: &str) -> bool {
        self.engine.equals(version, other)
    }

    fn get_major(&self, version: &str) -> Option<u64> {
        self.engine.get_major(version)
    }

    fn get_minor(&self, version: &str) -> Option<u64> {
        self.engine.get_minor(version)
    }

    fn get_patch(&self, version: &str) -> Option<u64> {
        self.engine.get_patch(version)
    }

    /// A candidate may only replace a pin of the same precision, so `v4`
    /// is never silently turned into `v4.1.0`.
    fn is_compatible(&self, version: &str, current: Option<&str>) -> bool {
        let Some(current) = current.filter(|current| !current.is_empty()) else {
            return self.engine.is_version(version);
        };

        let (Some(current_parsed), Some(candidate)) = (self.parse(current), self.parse(version))
        else {
            debug!(
                "Cannot check compatibility of {} against {}: unparsable version",
                version, current
            );
            return false;
        };

        if candidate.precision != current_parsed.precision {
            debug!(
                "{} is incompatible with {}: precision {:?} != {:?}",
                version, current, candidate.precision, current_parsed.precision
            );
            return false;
        }

        self.engine.is_version(version)
    }

    fn is_greater_than(&self, version: &str, other: &str) -> Result<bool, VersioningError> {
        Ok(self.sort_versions(version, other)?.is_gt())
    }

    /// Compares against a single version; range expressions are not expanded.
    fn is_less_than_range(&self, version: &str, range: &str) -> Result<bool, VersioningError> {
        Ok(self.sort_versions(version, range)?.is_lt())
    }

    fn is_single_version(&self, version: &str) -> bool {
        self.engine.is_single_version(version)
    }

    fn is_stable(&self, version: &str) -> bool {
        self.parse(version).is_some_and(|parsed| parsed.is_stable())
    }

    fn is_valid(&self, input: &str) -> bool {
        self.engine.is_valid(input)
    }

    fn is_version(&self, input: &str) -> bool {
        self.engine.is_version(input)
    }

    fn matches(&self, version: &str, range: &str) -> bool {
        self.engine.matches(version, range)
    }

    fn get_satisfying_version(&self, versions: &[String], range: &str) -> Option<String> {
        self.engine.get_satisfying_version(versions, range)
    }

    fn min_satisfying_version(&self, versions: &[String], range: &str) -> Option<String> {
        self.engine.min_satisfying_version(versions, range)
    }

    fn get_new_value(&self, config: &NewValueConfig) -> Option<String> {
        self.engine.get_new_value(config)
    }

    fn sort_versions(&self, a: &str, b: &str) -> Result<Ordering, VersioningError> {
        let v1 = self.parse_required(a)?;
        let v2 = self.parse_required(b)?;

        if v1.precision == Precision::Patch && v2.precision == Precision::Patch {
            match (v1.strict(), v2.strict()) {
                (Some(x), Some(y)) => return Ok(self.engine.compare(x, y)),
                _ => debug!(
                    "No strict form matching {} or {}, comparing components",
                    a, b
                ),
            }
        }

        Ok(compare_raw(&v1.raw, &v2.raw))
    }
}
