//! Cache key generation.

use sha2::{Digest, Sha256};
use url::Url;

/// Key under which a request's response is stored: the absolute URL with
/// any fragment removed. Query strings are significant.
pub fn request_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Row id for an entry: unique per (cache, request key).
pub fn compute_entry_hash(cache_name: &str, request_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(cache_name.as_bytes());
    hasher.update(b"\n");
    hasher.update(request_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_key_drops_fragment() {
        let url = Url::parse("https://example.com/offline.html#top").unwrap();
        assert_eq!(request_key(&url), "https://example.com/offline.html");
    }

    #[test]
    fn test_request_key_keeps_query() {
        let url = Url::parse("https://example.com/a.css?v=2").unwrap();
        assert_eq!(request_key(&url), "https://example.com/a.css?v=2");
    }

    #[test]
    fn test_hash_stability() {
        let hash1 = compute_entry_hash("developmomentum-offline-v1.0.0", "https://example.com/");
        let hash2 = compute_entry_hash("developmomentum-offline-v1.0.0", "https://example.com/");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_differs_per_cache() {
        let a = compute_entry_hash("developmomentum-offline-v1.0.0", "https://example.com/");
        let b = compute_entry_hash("developmomentum-offline-v1.0.1", "https://example.com/");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_format() {
        let hash = compute_entry_hash("c", "https://example.com");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
