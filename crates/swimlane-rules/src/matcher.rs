//! Matcher strings: comma-separated, optionally negated rule references.

/// One reference in a cell's matcher string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleToken<'a> {
    /// The referenced rule name.
    pub name: &'a str,
    /// Whether the reference was prefixed with `!`.
    pub negate: bool,
}

/// Split a matcher string into rule references.
///
/// Tokens are trimmed and empty tokens are skipped, so `"wip, !blocker,"`
/// yields two references. Names are not checked against a catalog here.
pub fn parse_matcher(matcher: &str) -> impl Iterator<Item = RuleToken<'_>> {
    matcher
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| match t.strip_prefix('!') {
            Some(name) => RuleToken {
                name: name.trim_start(),
                negate: true,
            },
            None => RuleToken {
                name: t,
                negate: false,
            },
        })
}
