//! Strict semver engine over coerced input
//!
//! Arbitrary strings are coerced into `MAJOR.MINOR.PATCH` before they are
//! compared or matched, so tags like `v4`, `release-1.2` or `1.2.3.4` can
//! still take part in semver comparisons.

pub mod range;

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::{Prerelease, Version};
use tracing::debug;

use crate::versioning::api::NewValueConfig;
use crate::versioning::strict::StrictEngine;

pub use range::Range;

/// First run of up to three dot-separated numbers not touching other digits
static COERCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,16})(?:\.(\d{1,16}))?(?:\.(\d{1,16}))?(?:$|\D)").unwrap()
});

/// Coerce an arbitrary string into a semver version.
///
/// Missing minor/patch components become 0. A prerelease directly following
/// the numbers is kept; build metadata is dropped.
///
/// Examples:
/// - "v4" -> 4.0.0
/// - "release-1.2" -> 1.2.0
/// - "1.2.3.4" -> 1.2.3
/// - "v1.2.3-beta.1+sha" -> 1.2.3-beta.1
/// - "latest" -> None
pub fn coerce(input: &str) -> Option<Version> {
    let caps = COERCE_RE.captures(input)?;

    let component = |index: usize| -> Option<u64> {
        caps.get(index)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };
    let mut version = Version::new(component(1)?, component(2)?, component(3)?);

    let numbers_end = caps
        .get(3)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(1))?
        .end();
    if let Some(rest) = input[numbers_end..].strip_prefix('-') {
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
            .unwrap_or(rest.len());
        if let Ok(pre) = Prerelease::new(&rest[..end]) {
            version.pre = pre;
        }
    }

    Some(version)
}

/// Default [`StrictEngine`] built on the `semver` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverCoerced;

impl SemverCoerced {
    fn satisfying<'a>(
        versions: &'a [String],
        range: &str,
    ) -> Option<impl Iterator<Item = (&'a String, Version)>> {
        let Some(range) = Range::parse(range) else {
            debug!("Invalid range: {}", range);
            return None;
        };

        Some(
            versions
                .iter()
                .filter_map(|v| coerce(v).map(|coerced| (v, coerced)))
                .filter(move |(_, coerced)| range.satisfies(coerced)),
        )
    }
}

impl StrictEngine for SemverCoerced {
    fn coerce(&self, input: &str) -> Option<Version> {
        coerce(input)
    }

    fn compare(&self, a: &Version, b: &Version) -> Ordering {
        a.cmp(b)
    }

    fn equals(&self, version: &str, other: &str) -> bool {
        match (coerce(version), coerce(other)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn get_major(&self, version: &str) -> Option<u64> {
        coerce(version).map(|v| v.major)
    }

    fn get_minor(&self, version: &str) -> Option<u64> {
        coerce(version).map(|v| v.minor)
    }

    fn get_patch(&self, version: &str) -> Option<u64> {
        coerce(version).map(|v| v.patch)
    }

    fn is_single_version(&self, version: &str) -> bool {
        let version = version.trim();
        let version = version.strip_prefix('v').unwrap_or(version);
        Version::parse(version).is_ok()
    }

    fn is_valid(&self, input: &str) -> bool {
        self.is_version(input) || Range::parse(input).is_some()
    }

    fn is_version(&self, input: &str) -> bool {
        coerce(input).is_some()
    }

    fn matches(&self, version: &str, range: &str) -> bool {
        let Some(coerced) = coerce(version) else {
            debug!("Cannot coerce version: {}", version);
            return false;
        };
        let Some(range) = Range::parse(range) else {
            debug!("Invalid range: {}", range);
            return false;
        };
        range.satisfies(&coerced)
    }

    fn get_satisfying_version(&self, versions: &[String], range: &str) -> Option<String> {
        Self::satisfying(versions, range)?
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(original, _)| original.clone())
    }

    fn min_satisfying_version(&self, versions: &[String], range: &str) -> Option<String> {
        Self::satisfying(versions, range)?
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(original, _)| original.clone())
    }

    fn get_new_value(&self, config: &NewValueConfig) -> Option<String> {
        Some(config.new_version.clone())
    }
}
