//! Query-string parameters turned into column assignments
//!
//! Every handler builds one [`ColumnParams`] per request from the parsed
//! query string. Keys keep the order in which they first appear, and a key
//! that repeats keeps its first value, so the columns of a generated
//! statement follow the caller's query string exactly.
//!
//! # Example
//! ```
//! use tablegate::core::params::{ColumnParams, AUTH_PARAM, ID_PARAM};
//!
//! let params: ColumnParams = [("id", "7"), ("vat", "21"), ("auth", "x"), ("vat", "9")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//!
//! assert_eq!(params.get(ID_PARAM), Some("7"));
//! assert_eq!(params.columns(&[AUTH_PARAM, ID_PARAM]), vec![("vat", "21")]);
//! ```

use indexmap::IndexMap;

/// Row identifier parameter
pub const ID_PARAM: &str = "id";

/// Column-selector expression parameter of `/get`
pub const WHAT_PARAM: &str = "what";

/// Reserved key that is never treated as a column
pub const AUTH_PARAM: &str = "auth";

/// Ordered mapping of query parameter names to their first value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnParams {
    values: IndexMap<String, String>,
}

impl ColumnParams {
    /// Build from decoded `(key, value)` pairs in query-string order
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut values = IndexMap::new();
        for (key, value) in pairs {
            values.entry(key).or_insert(value);
        }
        Self { values }
    }

    /// First value of `key`, or `None` when the key is absent or empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Column/value pairs in first-seen order, skipping the `excluded` keys
    ///
    /// Empty values are kept: `?vat=` assigns the empty string to `vat`.
    pub fn columns(&self, excluded: &[&str]) -> Vec<(&str, &str)> {
        self.values
            .iter()
            .filter(|(key, _)| !excluded.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the query string carried no parameters
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for ColumnParams {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ColumnParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        let p = params(&[("zeta", "1"), ("alpha", "2"), ("mid", "3")]);
        assert_eq!(
            p.columns(&[]),
            vec![("zeta", "1"), ("alpha", "2"), ("mid", "3")]
        );
    }

    #[test]
    fn test_repeated_key_keeps_first_value_and_position() {
        let p = params(&[("a", "1"), ("b", "2"), ("a", "3")]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.columns(&[]), vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_excluded_keys_are_skipped() {
        let p = params(&[("auth", "x"), ("id", "4"), ("vat", "21")]);
        assert_eq!(p.columns(&[AUTH_PARAM]), vec![("id", "4"), ("vat", "21")]);
        assert_eq!(p.columns(&[AUTH_PARAM, ID_PARAM]), vec![("vat", "21")]);
    }

    #[test]
    fn test_empty_value_counts_as_absent_for_get() {
        let p = params(&[("id", ""), ("what", "*")]);
        assert_eq!(p.get(ID_PARAM), None);
        assert_eq!(p.get(WHAT_PARAM), Some("*"));
        assert_eq!(p.get("missing"), None);
    }

    #[test]
    fn test_empty_value_is_still_a_column() {
        let p = params(&[("vat", "")]);
        assert_eq!(p.columns(&[]), vec![("vat", "")]);
    }

    #[test]
    fn test_empty_query() {
        let p = ColumnParams::default();
        assert!(p.is_empty());
        assert!(p.columns(&[AUTH_PARAM]).is_empty());
    }
}
