//! Cache Key Module
//!
//! Deterministic keys built from a category, an endpoint name and the
//! ordered request parameters.

use std::fmt;

use crate::cache::DataCategory;

const SEPARATOR: char = ':';

// == Cache Key ==
/// Encoded as `category:endpoint:param1:param2...`.
///
/// `%` and `:` inside parameters are percent-escaped, so `("a:b", "c")`
/// and `("a", "b:c")` never produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    category: DataCategory,
    encoded: String,
}

impl CacheKey {
    // == Constructor ==
    pub fn new(category: DataCategory, endpoint: &str) -> Self {
        let mut encoded = String::with_capacity(32);
        encoded.push_str(category.as_str());
        encoded.push(SEPARATOR);
        push_escaped(&mut encoded, endpoint);
        Self { category, encoded }
    }

    // == Param ==
    /// Appends one ordered parameter.
    pub fn param(mut self, value: impl fmt::Display) -> Self {
        self.encoded.push(SEPARATOR);
        push_escaped(&mut self.encoded, &value.to_string());
        self
    }

    /// Appends an optional parameter, encoding absence distinctly from any value.
    pub fn opt_param<T: fmt::Display>(self, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(format!("={v}")),
            None => self.param("-"),
        }
    }

    pub fn category(&self) -> DataCategory {
        self.category
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Prefix shared by every key of a category.
    pub fn category_prefix(category: DataCategory) -> String {
        format!("{}{}", category.as_str(), SEPARATOR)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

fn push_escaped(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '%' => out.push_str("%25"),
            ':' => out.push_str("%3A"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        let key = CacheKey::new(DataCategory::Matchup, "matchups")
            .param("123")
            .param(4);
        assert_eq!(key.as_str(), "matchup:matchups:123:4");
        assert_eq!(key.category(), DataCategory::Matchup);
    }

    #[test]
    fn test_identical_requests_produce_identical_keys() {
        let a = CacheKey::new(DataCategory::Roster, "rosters").param("42");
        let b = CacheKey::new(DataCategory::Roster, "rosters").param(String::from("42"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parameter_boundaries_do_not_collide() {
        let a = CacheKey::new(DataCategory::User, "u").param("a:b").param("c");
        let b = CacheKey::new(DataCategory::User, "u").param("a").param("b:c");
        assert_ne!(a, b);

        // A literal escape sequence stays distinct from the character it encodes
        let c = CacheKey::new(DataCategory::User, "u").param("a%3Ab");
        assert_ne!(c, CacheKey::new(DataCategory::User, "u").param("a:b"));
    }

    #[test]
    fn test_optional_param_absent_vs_present() {
        let none = CacheKey::new(DataCategory::PlayerStats, "stats").opt_param::<u8>(None);
        let dash = CacheKey::new(DataCategory::PlayerStats, "stats").opt_param(Some("-"));
        assert_ne!(none, dash);
    }

    #[test]
    fn test_category_prefix_matches_keys() {
        let key = CacheKey::new(DataCategory::LeagueSettings, "league").param("1");
        assert!(key
            .as_str()
            .starts_with(&CacheKey::category_prefix(DataCategory::LeagueSettings)));
        assert!(!key
            .as_str()
            .starts_with(&CacheKey::category_prefix(DataCategory::Roster)));
    }
}
