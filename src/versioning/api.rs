//! Host-facing versioning interface

use std::cmp::Ordering;

use serde::Deserialize;

use crate::versioning::error::VersioningError;

/// How the host wants a pinned value rewritten when a new version is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangeStrategy {
    #[default]
    Auto,
    Pin,
    Replace,
    Bump,
    Widen,
    UpdateLockfile,
}

/// Input for computing the value that replaces a pinned version
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewValueConfig {
    /// Value currently written in the source file (e.g. "v4")
    pub current_value: String,
    #[serde(default)]
    pub range_strategy: RangeStrategy,
    /// Version the current value resolves to, if known
    #[serde(default)]
    pub current_version: Option<String>,
    /// Version being upgraded to
    pub new_version: String,
}

/// Uniform interface a versioning scheme exposes to its host
///
/// Probing operations never fail: an unparsable input yields `false` or `None`.
/// Ordering operations return an error instead, since there is no neutral
/// ordering for an input that cannot be parsed.
pub trait VersioningApi: Send + Sync {
    /// Unique identifier of the scheme (e.g. "github-actions")
    fn id(&self) -> &'static str;

    /// Human-readable name of the scheme
    fn display_name(&self) -> &'static str;

    /// Documentation links
    fn urls(&self) -> &'static [&'static str];

    /// Whether multi-clause range syntax is supported as a pinned value
    fn supports_ranges(&self) -> bool;

    fn equals(&self, version: &str, other: &str) -> bool;

    fn get_major(&self, version: &str) -> Option<u64>;

    fn get_minor(&self, version: &str) -> Option<u64>;

    fn get_patch(&self, version: &str) -> Option<u64>;

    fn is_compatible(&self, version: &str, current: Option<&str>) -> bool;

    fn is_greater_than(&self, version: &str, other: &str) -> Result<bool, VersioningError>;

    fn is_less_than_range(&self, version: &str, range: &str) -> Result<bool, VersioningError>;

    fn is_single_version(&self, version: &str) -> bool;

    fn is_stable(&self, version: &str) -> bool;

    fn is_valid(&self, input: &str) -> bool;

    fn is_version(&self, input: &str) -> bool;

    fn matches(&self, version: &str, range: &str) -> bool;

    fn get_satisfying_version(&self, versions: &[String], range: &str) -> Option<String>;

    fn min_satisfying_version(&self, versions: &[String], range: &str) -> Option<String>;

    fn get_new_value(&self, config: &NewValueConfig) -> Option<String>;

    /// Order two versions
    ///
    /// Returns an error if either input cannot be parsed.
    fn sort_versions(&self, a: &str, b: &str) -> Result<Ordering, VersioningError>;
}

/// Sort `versions` ascending with `sort_versions`
///
/// Every entry is checked first, since `sort_by` never compares a lone
/// element.
pub fn sort<V>(versioning: &V, versions: &mut [String]) -> Result<(), VersioningError>
where
    V: VersioningApi + ?Sized,
{
    for version in versions.iter() {
        versioning.sort_versions(version, version)?;
    }

    let mut failure = None;
    versions.sort_by(|a, b| {
        versioning.sort_versions(a, b).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Ordering::Equal
        })
    });
    failure.map_or(Ok(()), Err)
}
