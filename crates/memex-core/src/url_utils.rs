//! URL normalization for page keys and domain filters.
//!
//! Pages are keyed by a normalized form of their URL: scheme, `www.` prefix,
//! fragment and trailing slash are removed and the host is lowercased, so
//! `http://www.bla.com/` and `https://bla.com` share the key `bla.com`.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static DOMAIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://)?(?:[a-z0-9-]+\.)+[a-z]{2,}(?::\d+)?/?$")
        .expect("domain pattern is valid")
});

fn parse_lenient(raw: &str) -> Option<Url> {
    if raw.contains("://") {
        Url::parse(raw).ok()
    } else {
        Url::parse(&format!("http://{}", raw)).ok()
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Normalize a full URL into the page key used throughout the index.
///
/// Normalization is idempotent: normalizing a key yields the same key.
///
/// ```
/// use memex_core::url_utils::normalize_url;
///
/// assert_eq!(normalize_url("http://www.bla.com/"), "bla.com");
/// assert_eq!(normalize_url("https://Example.org/a/b/#frag"), "example.org/a/b");
/// assert_eq!(normalize_url("bla.com"), "bla.com");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(parsed) = parse_lenient(trimmed) else {
        return trimmed.trim_end_matches('/').to_lowercase();
    };

    let host = parsed.host_str().map(strip_www).unwrap_or_default();
    let mut key = host.to_string();
    if let Some(port) = parsed.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }
    key.push_str(parsed.path().trim_end_matches('/'));
    if let Some(query) = parsed.query().filter(|q| !q.is_empty()) {
        key.push('?');
        key.push_str(query);
    }
    key
}

/// Hostname of a URL or page key, lowercased and without `www.`.
///
/// Returns `None` when the input has no host component.
pub fn extract_hostname(raw: &str) -> Option<String> {
    let parsed = parse_lenient(raw.trim())?;
    parsed
        .host_str()
        .map(|host| strip_www(host).to_string())
        .filter(|host| !host.is_empty())
}

/// Normalize a user-supplied domain filter (`https://www.Bla.com/x` -> `bla.com`).
pub fn normalize_domain(raw: &str) -> Option<String> {
    extract_hostname(raw)
}

/// Whether a free-text token should be read as a domain filter.
pub fn looks_like_domain(token: &str) -> bool {
    DOMAIN_PATTERN.is_match(token)
}
