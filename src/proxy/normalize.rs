//! Mapping inbound request paths onto the origin's URL space.

/// Join the origin base (minus one trailing `/`), the request path and the query pairs.
///
/// Pairs are written as `k=v` separated by `,` without any escaping. The
/// exact string feeds the cache key, so this form must stay stable.
pub fn resolve_url(base: &str, path: &str, query: &[(String, String)]) -> String {
    let mut url = String::with_capacity(base.len() + path.len() + 16);
    url.push_str(base.strip_suffix('/').unwrap_or(base));
    url.push_str(path);

    if !query.is_empty() {
        url.push('?');
        let joined = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",");
        url.push_str(&joined);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8080/exist/apps/prodomo";

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_path_only() {
        assert_eq!(
            resolve_url(BASE, "/page", &[]),
            "http://localhost:8080/exist/apps/prodomo/page"
        );
    }

    #[test]
    fn test_query_is_comma_joined() {
        assert_eq!(
            resolve_url(BASE, "/search", &pairs(&[("key1", "value1"), ("key2", "value2")])),
            "http://localhost:8080/exist/apps/prodomo/search?key1=value1,key2=value2"
        );
    }

    #[test]
    fn test_no_escaping() {
        assert_eq!(
            resolve_url("http://origin", "/q", &pairs(&[("name", "J.S. Bach&Sons")])),
            "http://origin/q?name=J.S. Bach&Sons"
        );
    }

    #[test]
    fn test_trailing_slash_on_base() {
        assert_eq!(resolve_url("http://origin/app/", "/x", &[]), "http://origin/app/x");
    }

    #[test]
    fn test_only_one_trailing_slash_removed() {
        assert_eq!(resolve_url("http://origin/app//", "/x", &[]), "http://origin/app//x");
    }
}
