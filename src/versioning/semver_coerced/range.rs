//! Range expressions understood by the coerced semver engine
//!
//! Supports npm-style range specifications:
//! - `1.2.3`, `=1.2.3` - exact match
//! - `1`, `1.4`, `1.x`, `1.4.*`, `*` - x-ranges (`1` means `>=1.0.0 <2.0.0`)
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.0.0 - 2.0.0` - hyphen range (inclusive)
//! - `>=1.0.0 <2.0.0` - space-separated, all must be satisfied
//! - `1.0.0 || 2.0.0` - any clause may be satisfied
//!
//! Every form is lowered to plain bound comparators when parsed.

use semver::{Prerelease, Version};

/// A parsed range expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Clauses joined by `||`; each clause is a set of comparators joined by AND
    clauses: Vec<Vec<Comparator>>,
}

impl Range {
    /// Parse a range expression, returning `None` if any clause is malformed
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }

        let clauses: Option<Vec<Vec<Comparator>>> = spec.split("||").map(parse_clause).collect();
        clauses.map(|clauses| Range { clauses })
    }

    /// Check if a version satisfies any clause of this range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause_satisfies(clause, version))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Comparator {
    /// Exact version match
    Exact(Version),
    /// Greater than or equal
    Gte(Version),
    /// Greater than
    Gt(Version),
    /// Less than or equal
    Lte(Version),
    /// Less than
    Lt(Version),
    /// Any version: `*` matches all versions
    Any,
}

impl Comparator {
    fn satisfies(&self, version: &Version) -> bool {
        match self {
            Comparator::Exact(v) => version == v,
            Comparator::Gte(v) => version >= v,
            Comparator::Gt(v) => version > v,
            Comparator::Lte(v) => version <= v,
            Comparator::Lt(v) => version < v,
            Comparator::Any => true,
        }
    }

    fn version(&self) -> Option<&Version> {
        match self {
            Comparator::Exact(v)
            | Comparator::Gte(v)
            | Comparator::Gt(v)
            | Comparator::Lte(v)
            | Comparator::Lt(v) => Some(v),
            Comparator::Any => None,
        }
    }
}

/// A prerelease version only satisfies a clause that names a prerelease of
/// the same `major.minor.patch`.
fn clause_satisfies(clause: &[Comparator], version: &Version) -> bool {
    if !clause.iter().all(|c| c.satisfies(version)) {
        return false;
    }
    if version.pre.is_empty() {
        return true;
    }

    clause.iter().filter_map(Comparator::version).any(|v| {
        !v.pre.is_empty()
            && v.major == version.major
            && v.minor == version.minor
            && v.patch == version.patch
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
    Caret,
    Tilde,
}

impl Operator {
    /// Split a leading operator off a comparator token
    fn split(token: &str) -> (Self, &str) {
        const PREFIXES: [(&str, Operator); 7] = [
            (">=", Operator::Gte),
            ("<=", Operator::Lte),
            (">", Operator::Gt),
            ("<", Operator::Lt),
            ("=", Operator::Eq),
            ("^", Operator::Caret),
            ("~", Operator::Tilde),
        ];

        PREFIXES
            .iter()
            .find_map(|&(prefix, op)| token.strip_prefix(prefix).map(|rest| (op, rest)))
            .unwrap_or((Operator::Eq, token))
    }

    fn is_bare(token: &str) -> bool {
        matches!(token, ">=" | "<=" | ">" | "<" | "=" | "^" | "~")
    }
}

/// Version operand that may leave trailing components unspecified
/// (`1`, `1.2`, `1.x`, `v1.2.3-rc.1`)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(operand: &str) -> Option<Self> {
        let operand = operand.trim();
        let operand = operand.strip_prefix('v').unwrap_or(operand);
        // Build metadata never takes part in matching
        let operand = operand.split_once('+').map_or(operand, |(core, _)| core);

        let (core, pre) = match operand.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (operand, Prerelease::EMPTY),
        };

        let mut components = Vec::with_capacity(3);
        for part in core.split('.') {
            components.push(parse_component(part)?);
        }
        if components.is_empty() || components.len() > 3 {
            return None;
        }
        components.resize(3, None);

        // Nothing concrete may follow a wildcard
        let first_wildcard = components.iter().position(Option::is_none);
        if let Some(index) = first_wildcard
            && components[index..].iter().any(Option::is_some)
        {
            return None;
        }
        if first_wildcard.is_some() && !pre.is_empty() {
            return None;
        }

        Some(Partial {
            major: components[0],
            minor: components[1],
            patch: components[2],
            pre,
        })
    }

    /// Lowest version within this partial
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }

    /// First version past this partial, for partials with a wildcard
    fn ceiling(&self) -> Option<Version> {
        match (self.major, self.minor) {
            (Some(major), None) => Some(Version::new(major.checked_add(1)?, 0, 0)),
            (Some(major), Some(minor)) => Some(Version::new(major, minor.checked_add(1)?, 0)),
            _ => None,
        }
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    fn is_any(&self) -> bool {
        self.major.is_none()
    }
}

/// Parse a single numeric component; `Some(None)` is a wildcard
fn parse_component(part: &str) -> Option<Option<u64>> {
    if matches!(part, "x" | "X" | "*") {
        return Some(None);
    }
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse::<u64>().ok().map(Some)
}

fn parse_clause(clause: &str) -> Option<Vec<Comparator>> {
    let clause = clause.trim();
    if clause.is_empty() {
        return None;
    }

    if let Some(comparators) = parse_hyphen(clause) {
        return Some(comparators);
    }

    let mut comparators = Vec::new();
    let mut tokens = clause.split_whitespace();
    while let Some(token) = tokens.next() {
        // Allow whitespace between an operator and its operand (">= 1.2.3")
        let token = if Operator::is_bare(token) {
            format!("{token}{}", tokens.next()?)
        } else {
            token.to_string()
        };
        comparators.extend(parse_comparator(&token)?);
    }
    Some(comparators)
}

/// Parse hyphen range like "1.0.0 - 2.0.0"
fn parse_hyphen(clause: &str) -> Option<Vec<Comparator>> {
    let (from, to) = clause.split_once(" - ")?;
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let mut comparators = Vec::with_capacity(2);
    if !from.is_any() {
        comparators.push(Comparator::Gte(from.floor()));
    }
    if to.is_full() {
        comparators.push(Comparator::Lte(to.floor()));
    } else if !to.is_any() {
        comparators.push(Comparator::Lt(to.ceiling()?));
    }
    if comparators.is_empty() {
        comparators.push(Comparator::Any);
    }
    Some(comparators)
}

/// Lower one operator/operand pair into bound comparators
fn parse_comparator(token: &str) -> Option<Vec<Comparator>> {
    let (op, operand) = Operator::split(token);
    let partial = Partial::parse(operand)?;

    if partial.is_any() {
        return match op {
            Operator::Gt | Operator::Lt => None,
            _ => Some(vec![Comparator::Any]),
        };
    }

    let floor = partial.floor();
    let comparators = match op {
        Operator::Eq if partial.is_full() => vec![Comparator::Exact(floor)],
        Operator::Eq => vec![Comparator::Gte(floor), Comparator::Lt(partial.ceiling()?)],
        Operator::Gte => vec![Comparator::Gte(floor)],
        Operator::Lt => vec![Comparator::Lt(floor)],
        Operator::Gt if partial.is_full() => vec![Comparator::Gt(floor)],
        // >1.2 means >=1.3.0
        Operator::Gt => vec![Comparator::Gte(partial.ceiling()?)],
        Operator::Lte if partial.is_full() => vec![Comparator::Lte(floor)],
        // <=1.2 means <1.3.0
        Operator::Lte => vec![Comparator::Lt(partial.ceiling()?)],
        Operator::Tilde => {
            // ~1 means 1.x, ~1.2 and ~1.2.3 stay within 1.2.x
            let upper = match partial.minor {
                None => partial.ceiling()?,
                Some(minor) => Version::new(floor.major, minor.checked_add(1)?, 0),
            };
            vec![Comparator::Gte(floor), Comparator::Lt(upper)]
        }
        Operator::Caret => vec![Comparator::Gte(floor), Comparator::Lt(caret_upper(&partial)?)],
    };
    Some(comparators)
}

/// Exclusive upper bound of a caret range
///
/// ^1.2.3 -> <2.0.0, ^0.2.3 -> <0.3.0, ^0.0.3 -> <0.0.4,
/// ^0.0 -> <0.1.0, ^0 -> <1.0.0
fn caret_upper(partial: &Partial) -> Option<Version> {
    let major = partial.major?;
    match (major, partial.minor, partial.patch) {
        (0, Some(0), Some(patch)) => Some(Version::new(0, 0, patch.checked_add(1)?)),
        (0, Some(minor), _) => Some(Version::new(0, minor.checked_add(1)?, 0)),
        _ => Some(Version::new(major.checked_add(1)?, 0, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfies(spec: &str, version: &str) -> bool {
        let range = Range::parse(spec).unwrap();
        range.satisfies(&Version::parse(version).unwrap())
    }

    #[rstest]
    #[case("1.0.0", "1.0.0", true)]
    #[case("1.0.0", "1.0.1", false)]
    #[case("=1.0.0", "1.0.0", true)]
    #[case("v1.0.0", "1.0.0", true)]
    #[case("1.0.0+build.5", "1.0.0", true)]
    fn satisfies_exact_match(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    // Bare partial versions are x-ranges, not padded exact versions
    #[rstest]
    #[case("1", "1.0.0", true)]
    #[case("1", "1.9.9", true)]
    #[case("1", "2.0.0", false)]
    #[case("1", "0.9.9", false)]
    #[case("1.4", "1.4.7", true)]
    #[case("1.4", "1.5.0", false)]
    #[case("v1", "1.2.0", true)]
    fn satisfies_partial_versions(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    // ^1.2.3 matches >=1.2.3 <2.0.0
    #[case("^1.2.3", "1.3.0", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    // ^0.2.3 matches >=0.2.3 <0.3.0
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    // ^0.0.3 matches >=0.0.3 <0.0.4
    #[case("^0.0.3", "0.0.3", true)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("^0.14", "0.14.5", true)]
    #[case("^0.14", "0.15.0", false)]
    #[case("^0.0", "0.0.9", true)]
    #[case("^0.0", "0.1.0", false)]
    #[case("^0", "0.9.0", true)]
    #[case("^0", "1.0.0", false)]
    fn satisfies_caret_range(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    // ~1.2.3 matches >=1.2.3 <1.3.0
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.2.2", false)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("~1.2", "1.2.0", true)]
    #[case("~1.2", "1.3.0", false)]
    // ~1 matches 1.x
    #[case("~1", "1.9.0", true)]
    #[case("~1", "2.0.0", false)]
    fn satisfies_tilde_range(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case(">=1.0.0", "1.0.0", true)]
    #[case(">=1.0.0", "0.9.9", false)]
    #[case(">1.0.0", "1.0.1", true)]
    #[case(">1.0.0", "1.0.0", false)]
    #[case("<=1.0.0", "1.0.0", true)]
    #[case("<=1.0.0", "1.0.1", false)]
    #[case("<1.0.0", "0.9.9", true)]
    #[case("<1.0.0", "1.0.0", false)]
    #[case(">= 1.2.0", "1.2.0", true)]
    // Partial operands follow x-range semantics
    #[case(">=1.2", "1.2.0", true)]
    #[case(">=1.2", "1.1.9", false)]
    #[case(">1.2", "1.2.9", false)]
    #[case(">1.2", "1.3.0", true)]
    #[case("<=1", "1.9.9", true)]
    #[case("<=1", "2.0.0", false)]
    #[case("<1.2", "1.1.9", true)]
    #[case("<1.2", "1.2.0", false)]
    fn satisfies_comparison_operators(
        #[case] spec: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("*", "0.0.1", true)]
    #[case("x", "4.0.0", true)]
    #[case("1.x", "1.9.9", true)]
    #[case("1.x", "2.0.0", false)]
    #[case("1.X", "1.5.0", true)]
    #[case("1.2.x", "1.2.9", true)]
    #[case("1.2.x", "1.3.0", false)]
    #[case("1.2.*", "1.2.5", true)]
    fn satisfies_wildcards(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("1.0.0 || 1.0.1", "1.0.1", true)]
    #[case("1.4.1 || 1.4.2", "1.2.3", false)]
    #[case("1.4 || 1.3", "1.2.1", false)]
    #[case("1.4 || 1.3", "1.3.2", true)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "1.2.0", true)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "1.6.0", false)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "2.5.0", true)]
    fn satisfies_or_range(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case(">=1.0.0 <2.0.0", "1.9.9", true)]
    #[case(">=1.0.0 <2.0.0", "2.0.0", false)]
    #[case(">1.0.0 <=2.0.0", "2.0.0", true)]
    #[case(">1.0.0 <=2.0.0", "1.0.0", false)]
    fn satisfies_and_range(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    // 1.0.0 - 2.0.0 matches >=1.0.0 <=2.0.0
    #[case("1.0.0 - 2.0.0", "1.0.0", true)]
    #[case("1.0.0 - 2.0.0", "2.0.0", true)]
    #[case("1.0.0 - 2.0.0", "0.9.9", false)]
    #[case("1.0.0 - 2.0.0", "2.0.1", false)]
    // A partial upper bound covers the whole x-range
    #[case("1.0.0 - 2", "2.9.9", true)]
    #[case("1.0.0 - 2", "3.0.0", false)]
    fn satisfies_hyphen_range(#[case] spec: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("^1.0.0", "1.5.0-beta", false)]
    #[case("*", "1.0.0-rc.1", false)]
    #[case(">=1.5.0-alpha <2.0.0", "1.5.0-beta", true)]
    #[case(">=1.5.0-alpha <2.0.0", "1.6.0-beta", false)]
    #[case("1.0.0-rc.1", "1.0.0-rc.1", true)]
    fn prerelease_requires_matching_comparator(
        #[case] spec: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(spec, version), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("invalid")]
    #[case("1.0.0 ||")]
    #[case("1.x.3")]
    #[case("1.2.3.4")]
    #[case(">")]
    #[case(">*")]
    #[case("1.2-beta")]
    fn parse_rejects_malformed_ranges(#[case] spec: &str) {
        assert_eq!(Range::parse(spec), None);
    }
}
