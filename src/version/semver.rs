use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Release tags: digits and dots only, at least two components, optional `v`.
/// Pre-release and build suffixes never match.
static SEMVER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?[0-9]+(\.[0-9]+)+$").expect("valid semver tag pattern"));

/// Returns true if the tag is a comparable release version.
///
/// Examples:
/// - "1.0", "v2.3.4" -> true
/// - "latest", "1.0.0-rc1", "alpine3.18", "7" -> false
pub fn is_semver(tag: &str) -> bool {
    SEMVER_TAG.is_match(tag)
}

/// Compare two release versions component by component.
///
/// A single leading `v` is ignored and missing trailing components count as
/// zero, so "1.0" equals "1.0.0". Inputs are expected to satisfy [`is_semver`].
/// Components are compared as digit strings, so numbers of any length order
/// correctly.
pub fn compare_semver(a: &str, b: &str) -> Ordering {
    let parts_a = components(a);
    let parts_b = components(b);
    let len = parts_a.len().max(parts_b.len());

    (0..len)
        .map(|i| {
            let x = parts_a.get(i).copied().unwrap_or("");
            let y = parts_b.get(i).copied().unwrap_or("");
            compare_component(x, y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Components with leading zeros stripped; zero itself becomes "".
fn components(version: &str) -> Vec<&str> {
    version
        .strip_prefix('v')
        .unwrap_or(version)
        .split('.')
        .map(|part| part.trim_start_matches('0'))
        .collect()
}

/// Longer digit strings are larger numbers; equal lengths compare lexically.
fn compare_component(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Find the highest release version among the given tags.
///
/// Tags that are not release versions are skipped. Among tags that compare
/// equal ("1.0" and "1.0.0") the one listed last wins.
pub fn find_semantic_max<I, S>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter(|tag| is_semver(tag.as_ref()))
        .max_by(|a, b| compare_semver(a.as_ref(), b.as_ref()))
        .map(|tag| tag.as_ref().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.0", true)]
    #[case("v2.3.4", true)]
    #[case("1.2.3.4", true)]
    #[case("latest", false)]
    #[case("1.0.0-rc1", false)]
    #[case("alpine3.18", false)]
    #[case("7", false)]
    #[case("v", false)]
    #[case("1.", false)]
    #[case("V1.0", false)]
    #[case("", false)]
    fn is_semver_returns_expected(#[case] tag: &str, #[case] expected: bool) {
        assert_eq!(is_semver(tag), expected);
    }

    #[rstest]
    #[case("1.0", "1.0.0", Ordering::Equal)]
    #[case("1.0.1", "1.0.0", Ordering::Greater)]
    #[case("v1.0", "2.0", Ordering::Less)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("v3.0.0", "v3.0", Ordering::Equal)]
    #[case("1.2.3.1", "1.2.3", Ordering::Greater)]
    #[case("1.01", "1.1", Ordering::Equal)]
    #[case("1.0.0", "1", Ordering::Equal)]
    #[case("99999999999999999999.0", "1.0", Ordering::Greater)]
    #[case("18446744073709551616.0", "18446744073709551615.0", Ordering::Greater)]
    fn compare_semver_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_semver(a, b), expected);
    }

    #[rstest]
    #[case(vec![], None)]
    #[case(vec!["1.24", "1.25", "1.26", "latest"], Some("1.26"))]
    #[case(vec!["1.9", "1.10", "1.2"], Some("1.10"))]
    #[case(vec!["v1.0.0", "2.0.0", "v1.5.0"], Some("2.0.0"))]
    #[case(vec!["latest", "alpine", "1.0.0-rc1"], None)]
    #[case(vec!["1.0", "1.0.0"], Some("1.0.0"))]
    #[case(vec!["1.0", "99999999999999999999.0"], Some("99999999999999999999.0"))]
    fn find_semantic_max_returns_expected(
        #[case] tags: Vec<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(find_semantic_max(tags), expected.map(|s| s.to_string()));
    }
}
