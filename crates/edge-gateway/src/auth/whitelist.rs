//! Token-exempt route whitelist.
//!
//! Configured patterns may carry one trailing wildcard form (`/**`, `/*`,
//! or a bare `*`). Patterns are normalized once at startup into literal
//! prefixes, so the per-request check degenerates to a plain string
//! prefix test, with no regex and no allocation on the hot path.

/// Normalize raw whitelist patterns into literal path prefixes.
///
/// Each non-blank pattern is trimmed, then exactly one trailing wildcard
/// form is stripped, longest-specific first: `/**`, then `/*`, then a bare
/// trailing `*` that is not itself part of the former two. Patterns that
/// normalize to the empty string are discarded: a configured `"*"` must
/// never become a match-everything prefix.
///
/// Pure and deterministic: same input, same output, in input order.
#[must_use]
pub fn normalize(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .map(|pattern| strip_wildcard(pattern.trim()))
        .filter(|prefix| !prefix.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Strip one recognized trailing wildcard form from a pattern.
fn strip_wildcard(pattern: &str) -> &str {
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return prefix;
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return prefix;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        // A bare `*` only counts when it is not the tail of `**`.
        if !prefix.ends_with('*') {
            return prefix;
        }
    }
    pattern
}

/// Normalized whitelist of token-exempt route prefixes.
///
/// Built once at startup from the configured patterns and read-only for
/// the process lifetime.
#[derive(Clone, Debug)]
pub struct Whitelist {
    prefixes: Vec<String>,
}

impl Whitelist {
    /// Build a whitelist from raw configured patterns.
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        Self {
            prefixes: normalize(patterns),
        }
    }

    /// True iff any normalized prefix is a literal prefix of `path`.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    /// The normalized prefixes, for startup logging.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
