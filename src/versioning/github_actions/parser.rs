//! Variable-precision version parser
//!
//! Grammar: optional `v`, a major number, optionally `.minor`, optionally
//! `.patch`, then anything else as an unvalidated qualifier.
//!
//! - "1" -> precision 1
//! - "v1.2" -> precision 2
//! - "1.2.3-beta" -> precision 3, prerelease "-beta"
//! - "1.x" -> precision 1, prerelease ".x"
//!
//! Components are unbounded: a digit run of any length is a component.

use std::cmp::Ordering;
use std::fmt;

use semver::Version;

use crate::versioning::semver_coerced;

/// Number of numeric components written explicitly in a version string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    Major = 1,
    Minor = 2,
    Patch = 3,
}

impl Precision {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// A numeric component of arbitrary length, stored as its digits
/// without leading zeros
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component(String);

impl Component {
    fn from_digits(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// The value, if it fits in a `u64`
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for Component {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl PartialEq<u64> for Component {
    fn eq(&self, other: &u64) -> bool {
        self.to_u64() == Some(*other)
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        // No leading zeros, so a longer run is a larger number
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A version string parsed with its precision preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// `[major, minor, patch]` with absent components as 0
    ///
    /// Not meaningful for ordering: "1" and "1.0.0" share a release.
    pub release: [Component; 3],
    /// `[major, minor, patch]` as written; `None` where a component is absent
    pub raw: [Option<Component>; 3],
    pub precision: Precision,
    /// Everything after the numeric components, verbatim
    pub prerelease: Option<String>,
    /// Strict form of the whole input, used when both sides are fully specified
    pub coerced: Option<Version>,
}

impl ParsedVersion {
    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }

    /// The coerced form, provided it describes the same release as the
    /// written components
    ///
    /// Coercion only looks at up to 16 digits per component, so a longer
    /// component makes it pick up a different release.
    pub fn strict(&self) -> Option<&Version> {
        self.coerced.as_ref().filter(|version| {
            self.release[0] == version.major
                && self.release[1] == version.minor
                && self.release[2] == version.patch
        })
    }
}

/// Parse a version string, coercing it with the default semver engine
pub fn parse(input: &str) -> Option<ParsedVersion> {
    parse_with(input, semver_coerced::coerce)
}

/// Parse a version string, computing its strict form with `coerce`
///
/// Returns `None` unless the input starts with an optional `v` followed by
/// at least one digit.
pub fn parse_with<F>(input: &str, coerce: F) -> Option<ParsedVersion>
where
    F: FnOnce(&str) -> Option<Version>,
{
    let mut cursor = Cursor::new(input);
    cursor.eat('v');

    let major = cursor.number()?;
    let minor = cursor.dotted_number();
    let patch = minor.as_ref().and_then(|_| cursor.dotted_number());

    let precision = match (&minor, &patch) {
        (None, _) => Precision::Major,
        (Some(_), None) => Precision::Minor,
        (Some(_), Some(_)) => Precision::Patch,
    };
    let raw = [Some(major), minor, patch];
    let rest = cursor.rest();

    Some(ParsedVersion {
        release: raw.clone().map(|component| component.unwrap_or_else(Component::zero)),
        raw,
        precision,
        prerelease: (!rest.is_empty()).then(|| rest.to_string()),
        coerced: coerce(input),
    })
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume a run of ASCII digits
    fn number(&mut self) -> Option<Component> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(Component::from_digits(&rest[..len]))
    }

    /// Consume `.digits`, leaving the cursor untouched if it isn't there
    fn dotted_number(&mut self) -> Option<Component> {
        let start = self.pos;
        if self.eat('.')
            && let Some(value) = self.number()
        {
            return Some(value);
        }
        self.pos = start;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", [Some(1), None, None], Precision::Major, None)]
    #[case("v1", [Some(1), None, None], Precision::Major, None)]
    #[case("1.2", [Some(1), Some(2), None], Precision::Minor, None)]
    #[case("1.2.3", [Some(1), Some(2), Some(3)], Precision::Patch, None)]
    #[case("v10.20.30", [Some(10), Some(20), Some(30)], Precision::Patch, None)]
    #[case("1.2.3-beta", [Some(1), Some(2), Some(3)], Precision::Patch, Some("-beta"))]
    #[case("1.2.3.4", [Some(1), Some(2), Some(3)], Precision::Patch, Some(".4"))]
    #[case("v4-rc", [Some(4), None, None], Precision::Major, Some("-rc"))]
    #[case("1.x", [Some(1), None, None], Precision::Major, Some(".x"))]
    #[case("1.", [Some(1), None, None], Precision::Major, Some("."))]
    #[case("1.2a", [Some(1), Some(2), None], Precision::Minor, Some("a"))]
    #[case("1.2.", [Some(1), Some(2), None], Precision::Minor, Some("."))]
    fn parse_returns_expected(
        #[case] input: &str,
        #[case] raw: [Option<u64>; 3],
        #[case] precision: Precision,
        #[case] prerelease: Option<&str>,
    ) {
        let parsed = parse(input).unwrap();

        assert_eq!(parsed.raw, raw.map(|c| c.map(Component::from)));
        assert_eq!(parsed.precision, precision);
        assert_eq!(parsed.prerelease.as_deref(), prerelease);
    }

    #[rstest]
    #[case("")]
    #[case("v")]
    #[case("vv1")]
    #[case("latest")]
    #[case("release-1.2.3")]
    #[case(" 1.2.3")]
    #[case(".1")]
    fn parse_rejects_input_without_leading_number(#[case] input: &str) {
        assert_eq!(parse(input), None);
    }

    #[test]
    fn parse_keeps_absent_components_distinct_from_zero() {
        let partial = parse("1").unwrap();
        let full = parse("1.0.0").unwrap();

        assert_eq!(partial.release, full.release);
        assert_ne!(partial.raw, full.raw);
        assert_eq!(partial.release, [1u64, 0, 0]);
    }

    #[test]
    fn parse_accepts_components_beyond_u64() {
        let parsed = parse("99999999999999999999999").unwrap();
        assert_eq!(parsed.precision, Precision::Major);
        assert_eq!(parsed.release[0].as_str(), "99999999999999999999999");
        assert_eq!(parsed.release[0].to_u64(), None);
        assert!(parsed.is_stable());

        let parsed = parse("1.99999999999999999999").unwrap();
        assert_eq!(parsed.precision, Precision::Minor);
        assert_eq!(parsed.raw[0], Some(Component::from(1)));
        assert_eq!(
            parsed.raw[1].as_ref().map(Component::as_str),
            Some("99999999999999999999")
        );
        assert_eq!(parsed.prerelease, None);

        let parsed = parse("v1.2.18446744073709551616-rc").unwrap();
        assert_eq!(parsed.precision, Precision::Patch);
        assert_eq!(parsed.prerelease.as_deref(), Some("-rc"));
    }

    #[test]
    fn parse_trims_leading_zeros() {
        let parsed = parse("01.002.0").unwrap();
        assert_eq!(parsed.release, [1u64, 2, 0]);
        assert_eq!(parsed.raw[2].as_ref().map(Component::as_str), Some("0"));
    }

    #[rstest]
    #[case("9", "10", Ordering::Less)]
    #[case("10", "10", Ordering::Equal)]
    #[case("18446744073709551615", "18446744073709551616", Ordering::Less)]
    #[case("100000000000000000000", "99999999999999999999", Ordering::Greater)]
    #[case("007", "7", Ordering::Equal)]
    fn component_orders_numerically(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(
            Component::from_digits(a).cmp(&Component::from_digits(b)),
            expected
        );
    }

    #[test]
    fn strict_form_requires_matching_components() {
        let parsed = parse("1.2.3").unwrap();
        assert_eq!(parsed.strict(), Some(&Version::new(1, 2, 3)));

        // Coercion stops at 16 digits and lands on 1.0.0
        let parsed = parse("1.12345678901234567.0").unwrap();
        assert_eq!(parsed.coerced, Some(Version::new(1, 0, 0)));
        assert_eq!(parsed.strict(), None);
    }

    #[test]
    fn precision_matches_present_components() {
        for input in ["1", "1.0", "1.0.0", "v2.1-beta"] {
            let parsed = parse(input).unwrap();
            let present = parsed.raw.iter().filter(|c| c.is_some()).count();
            assert_eq!(parsed.precision.as_u8() as usize, present, "{input}");
        }
    }

    #[test]
    fn parse_computes_coerced_form_from_whole_input() {
        let parsed = parse("v1.2-beta").unwrap();
        assert_eq!(parsed.coerced, Some(Version::parse("1.2.0-beta").unwrap()));

        let parsed = parse("1.2.3").unwrap();
        assert_eq!(parsed.coerced, Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn parse_with_uses_given_coercion() {
        let parsed = parse_with("1.2.3", |_| None).unwrap();
        assert_eq!(parsed.coerced, None);
    }

    #[rstest]
    #[case("1.2.3", true)]
    #[case("v1", true)]
    #[case("1.2.3-beta", false)]
    #[case("1.2.3+build", false)]
    fn is_stable_depends_on_prerelease(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse(input).unwrap().is_stable(), expected);
    }
}
