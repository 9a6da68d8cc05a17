//! Query utilities for WAPI
//!
//! Provides helpers for building search and `_return_fields` query strings.

use crate::common::HttpClient;
use crate::error::InfobloxError;
use serde::de::DeserializeOwned;

/// Build a query string from filters, always ending with `_return_fields`
pub fn build_query_string(filters: &[(&str, &str)], return_fields: &str) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .chain(std::iter::once(format!("_return_fields={}", urlencoding::encode(return_fields))))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append `_return_fields` to a path (object type or reference)
pub fn with_return_fields(path: &str, return_fields: &str) -> String {
    format!("{}?{}", path, build_query_string(&[], return_fields))
}

/// Search objects of one type with equality filters
pub async fn search_objects<T: DeserializeOwned>(
    http: &HttpClient,
    object_type: &str,
    filters: &[(&str, &str)],
    return_fields: &str,
) -> Result<Vec<T>, InfobloxError> {
    let path = format!("{}?{}", object_type, build_query_string(filters, return_fields));
    http.get(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query_string_encodes_values() {
        let query = build_query_string(&[("network", "10.10.0.0/24"), ("network_view", "default")], "network,extattrs");
        assert_eq!(
            query,
            "network=10.10.0.0%2F24&network_view=default&_return_fields=network%2Cextattrs"
        );
    }

    #[test]
    fn test_with_return_fields() {
        assert_eq!(with_return_fields("record:srv", "name,port"), "record:srv?_return_fields=name%2Cport");
    }
}
