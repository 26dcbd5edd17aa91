//! Name selection for benchmarks (plain name) and tests (full path).

use regex::Regex;

use crate::error::{Error, Result};
use crate::run::PATH_SEPARATOR;

/// Process-wide selection pattern, defaulting to match-everything.
///
/// Benchmarks are flat and match on the registered name; tests are
/// addressed by their full hierarchical path. The asymmetry is
/// deliberate: nesting makes a plain name ambiguous for tests.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pattern: String,
    re: Option<Regex>,
}

impl Filter {
    /// Compile a filter from a regex pattern. Fails with a contract
    /// error when the pattern does not compile.
    pub fn new(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern).map_err(|source| Error::BadFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            re: Some(re),
        })
    }

    /// The match-everything filter.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// The pattern this filter was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Flat-name rule used for benchmarks.
    pub fn matches_name(&self, name: &str) -> bool {
        self.re.as_ref().map_or(true, |re| re.is_match(name))
    }

    /// Full-path rule used for tests: the regex must match the path, or
    /// the pattern must be a literal extension of it. The extension rule
    /// lets the ancestors of a filtered deep test execute so the target
    /// can be reached, while non-ancestor siblings are skipped.
    pub fn matches_path(&self, path: &str) -> bool {
        let Some(re) = &self.re else {
            return true;
        };
        if re.is_match(path) {
            return true;
        }
        let mut prefix = String::with_capacity(path.len() + 1);
        prefix.push_str(path);
        prefix.push(PATH_SEPARATOR);
        self.pattern.starts_with(&prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn match_all_accepts_everything() {
        let filter = Filter::match_all();
        assert!(filter.matches_name("bench_anything"));
        assert!(filter.matches_path("top/mid/low"));
    }

    #[test]
    fn name_rule_is_plain_regex() {
        let filter = Filter::new("alloc").unwrap();
        assert!(filter.matches_name("bench_alloc_small"));
        assert!(!filter.matches_name("bench_parse"));
    }

    #[test]
    fn path_rule_accepts_ancestors_of_the_target() {
        let filter = Filter::new("top/mid/low").unwrap();
        assert!(filter.matches_path("top"));
        assert!(filter.matches_path("top/mid"));
        assert!(filter.matches_path("top/mid/low"));
        assert!(!filter.matches_path("top/sibling"));
        assert!(!filter.matches_path("other"));
    }

    #[test]
    fn path_rule_still_honors_regex_matches() {
        let filter = Filter::new("mid").unwrap();
        assert!(filter.matches_path("top/mid"));
        assert!(filter.matches_path("top/mid/low"));
        assert!(!filter.matches_path("top/other"));
    }

    #[test]
    fn invalid_pattern_is_a_contract_error() {
        let err = Filter::new("(unclosed").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Contract);
    }
}
