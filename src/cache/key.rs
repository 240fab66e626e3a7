//! Request fingerprints used as cache keys

use std::fmt::Display;

/// Builds a deterministic cache key for an endpoint and its query parameters
///
/// Parameters are sorted by name before rendering, so the same request shape
/// produces the same key no matter the order the parameters were supplied in.
///
/// ```
/// use coinfront::cache::build_key;
///
/// let a = build_key("/coins/markets", [("page", "1"), ("per_page", "10")]);
/// let b = build_key("/coins/markets", [("per_page", "10"), ("page", "1")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "/coins/markets?page=1&per_page=10");
/// ```
pub fn build_key<I, K, V>(endpoint: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let mut pairs: Vec<(K, String)> = params
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect();
    pairs.sort_by(|a, b| a.0.as_ref().cmp(b.0.as_ref()));

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", endpoint, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_key_is_order_independent() {
        let forward = build_key("/e", [("a", 1), ("b", 2)]);
        let reversed = build_key("/e", [("b", 2), ("a", 1)]);
        assert_eq!(forward, reversed);
        assert_eq!(forward, "/e?a=1&b=2");
    }

    #[test]
    fn test_build_key_accepts_hash_map() {
        let mut params = HashMap::new();
        params.insert("vs_currency", "usd".to_string());
        params.insert("order", "market_cap_desc".to_string());
        params.insert("sparkline", "false".to_string());

        let key = build_key("/coins/markets", &params);
        assert_eq!(
            key,
            "/coins/markets?order=market_cap_desc&sparkline=false&vs_currency=usd"
        );
    }

    #[test]
    fn test_build_key_with_no_params() {
        let key = build_key("/ping", Vec::<(&str, &str)>::new());
        assert_eq!(key, "/ping?");
    }

    #[test]
    fn test_build_key_distinguishes_values_and_endpoints() {
        let page_one = build_key("/coins/markets", [("page", 1)]);
        let page_two = build_key("/coins/markets", [("page", 2)]);
        let other = build_key("/coins/bitcoin/market_chart/range", [("page", 1)]);

        assert_ne!(page_one, page_two);
        assert_ne!(page_one, other);
    }
}
