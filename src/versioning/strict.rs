//! Strict semantic-version engine consumed by loosely-formatted schemes

use std::cmp::Ordering;

#[cfg(test)]
use mockall::automock;
use semver::Version;

use crate::versioning::api::NewValueConfig;

/// Full semantic-version engine
///
/// Schemes that accept partial versions delegate here for comparisons between
/// fully specified versions and for all range handling.
#[cfg_attr(test, automock)]
pub trait StrictEngine: Send + Sync + 'static {
    /// Best-effort coercion of an arbitrary string into `MAJOR.MINOR.PATCH`
    fn coerce(&self, input: &str) -> Option<Version>;

    /// Compare two versions, honouring prerelease precedence
    fn compare(&self, a: &Version, b: &Version) -> Ordering;

    fn equals(&self, version: &str, other: &str) -> bool;

    fn get_major(&self, version: &str) -> Option<u64>;

    fn get_minor(&self, version: &str) -> Option<u64>;

    fn get_patch(&self, version: &str) -> Option<u64>;

    fn is_single_version(&self, version: &str) -> bool;

    fn is_valid(&self, input: &str) -> bool;

    fn is_version(&self, input: &str) -> bool;

    fn matches(&self, version: &str, range: &str) -> bool;

    fn get_satisfying_version(&self, versions: &[String], range: &str) -> Option<String>;

    fn min_satisfying_version(&self, versions: &[String], range: &str) -> Option<String>;

    fn get_new_value(&self, config: &NewValueConfig) -> Option<String>;
}
