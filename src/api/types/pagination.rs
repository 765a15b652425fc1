//! Lenient query-parameter parsing
//!
//! Non-numeric `limit`/`offset` silently fall back to the defaults rather
//! than erroring; numeric values are clamped into range. The leniency is
//! deliberate and matched by tests.

use std::collections::HashMap;

pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageParams {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let limit = params
            .get("limit")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        let offset = params
            .get("offset")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
            .max(0);

        Self { limit, offset }
    }
}

/// Parse an optional boolean query parameter. Accepts `true`/`1` and
/// `false`/`0`, case-insensitively; anything else means "not supplied".
pub fn bool_param(params: &HashMap<String, String>, name: &str) -> Option<bool> {
    match params.get(name)?.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let params = PageParams::from_query(&HashMap::new());
        assert_eq!(params, PageParams::default());
        assert_eq!(params.limit, 100);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_values_parsed() {
        let params = PageParams::from_query(&query(&[("limit", "25"), ("offset", "50")]));
        assert_eq!(params.limit, 25);
        assert_eq!(params.offset, 50);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(
            PageParams::from_query(&query(&[("limit", "1000000")])).limit,
            MAX_LIMIT
        );
        assert_eq!(PageParams::from_query(&query(&[("limit", "0")])).limit, 1);
        assert_eq!(PageParams::from_query(&query(&[("limit", "-5")])).limit, 1);
    }

    #[test]
    fn test_non_numeric_falls_back_to_defaults() {
        let params = PageParams::from_query(&query(&[("limit", "abc"), ("offset", "xyz")]));
        assert_eq!(params.limit, DEFAULT_LIMIT);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_negative_offset_clamped() {
        assert_eq!(
            PageParams::from_query(&query(&[("offset", "-10")])).offset,
            0
        );
    }

    #[test]
    fn test_bool_param() {
        assert_eq!(bool_param(&query(&[("is_active", "true")]), "is_active"), Some(true));
        assert_eq!(bool_param(&query(&[("is_active", "1")]), "is_active"), Some(true));
        assert_eq!(bool_param(&query(&[("is_active", "FALSE")]), "is_active"), Some(false));
        assert_eq!(bool_param(&query(&[("is_active", "0")]), "is_active"), Some(false));
        assert_eq!(bool_param(&query(&[("is_active", "maybe")]), "is_active"), None);
        assert_eq!(bool_param(&HashMap::new(), "is_active"), None);
    }
}
