//! URL resolution against the worker scope.

use url::Url;

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Resolve a request target against the worker scope.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Join relative paths (`assets/css/styles.css`, `/blog/x`) onto `scope`
/// 3. Reject anything but http/https
/// 4. Lowercase the host
/// 5. Remove fragment (#...); keep the query string intact
pub fn resolve(scope: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = scope.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Parse a scope URL, making sure it ends in `/` so relative joins land
/// inside it rather than replacing its last segment.
pub fn parse_scope(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut scope = Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    match scope.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if !scope.path().ends_with('/') {
        let path = format!("{}/", scope.path());
        scope.set_path(&path);
    }
    scope.set_query(None);
    scope.set_fragment(None);

    Ok(scope)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Url {
        parse_scope("https://developmomentum.com/").unwrap()
    }

    #[test]
    fn test_resolve_relative_asset() {
        let url = resolve(&scope(), "assets/css/styles.css").unwrap();
        assert_eq!(url.as_str(), "https://developmomentum.com/assets/css/styles.css");
    }

    #[test]
    fn test_resolve_absolute_path() {
        let url = resolve(&scope(), "/blog/some-post").unwrap();
        assert_eq!(url.as_str(), "https://developmomentum.com/blog/some-post");
    }

    #[test]
    fn test_resolve_absolute_url() {
        let url = resolve(&scope(), "https://EXAMPLE.COM/a.js").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.js");
    }

    #[test]
    fn test_resolve_remove_fragment() {
        let url = resolve(&scope(), "offline.html#retry").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/offline.html");
    }

    #[test]
    fn test_resolve_preserve_query() {
        let url = resolve(&scope(), "assets/js/themes.js?v=2").unwrap();
        assert_eq!(url.query(), Some("v=2"));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        let result = resolve(&scope(), "file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_resolve_whitespace_only() {
        let result = resolve(&scope(), "   ");
        assert!(matches!(result, Err(UrlError::Empty)));
    }

    #[test]
    fn test_parse_scope_adds_trailing_slash() {
        let scope = parse_scope("https://example.com/blog").unwrap();
        assert_eq!(scope.as_str(), "https://example.com/blog/");
        let url = resolve(&scope, "offline.html").unwrap();
        assert_eq!(url.as_str(), "https://example.com/blog/offline.html");
    }

    #[test]
    fn test_parse_scope_rejects_ftp() {
        assert!(matches!(parse_scope("ftp://example.com/"), Err(UrlError::UnsupportedScheme(_))));
    }
}
