//! Offline page served when the cached one is unavailable.

use shellcache_core::Response;

/// Status of the synthesized page; the content is a stand-in, not the document.
pub const INLINE_FALLBACK_STATUS: u16 = 503;

const INLINE_FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Offline</title>
</head>
<body>
<h1>You are offline</h1>
<p>This page could not be loaded. Check your connection and try again.</p>
</body>
</html>
"#;

/// Minimal offline document for `url`.
pub fn inline_offline_page(url: &str) -> Response {
    Response::new(url, "text/html; charset=utf-8", INLINE_FALLBACK_HTML).with_status(INLINE_FALLBACK_STATUS)
}
