//! Turn what the user submitted in the URL bar into something to open.
//!
//! Text that already looks like an address becomes a URL (an `http://`
//! scheme is added when missing); everything else becomes a search query
//! substituted into a search template.

/// Default search template. `%s` is replaced with the encoded query.
pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";

const KNOWN_SCHEMES: &[&str] = &["http://", "https://", "about:", "file://"];

/// What a submitted entry resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Open this URL.
    Url(String),
    /// Run a search; the string is the full search URL.
    Search(String),
}

impl Resolved {
    /// The URL to open, for either variant.
    pub fn as_str(&self) -> &str {
        match self {
            Resolved::Url(url) | Resolved::Search(url) => url,
        }
    }
}

/// Resolve a submitted entry against `search_template`.
///
/// Returns `None` for blank input.
///
/// ```
/// use omnibar_widgets::url_fixup::{resolve_entry, Resolved, DEFAULT_SEARCH_TEMPLATE};
///
/// assert_eq!(
///     resolve_entry("mozilla.org", DEFAULT_SEARCH_TEMPLATE),
///     Some(Resolved::Url("http://mozilla.org".into())),
/// );
/// assert_eq!(
///     resolve_entry("rust ownership", DEFAULT_SEARCH_TEMPLATE),
///     Some(Resolved::Search("https://duckduckgo.com/?q=rust%20ownership".into())),
/// );
/// ```
pub fn resolve_entry(text: &str, search_template: &str) -> Option<Resolved> {
    let entry = text.trim();
    if entry.is_empty() {
        return None;
    }

    let lowered = entry.to_lowercase();
    if KNOWN_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return Some(Resolved::Url(entry.to_string()));
    }

    if looks_like_host(entry) {
        return Some(Resolved::Url(format!("http://{entry}")));
    }

    let query = urlencoding::encode(entry);
    Some(Resolved::Search(search_template.replace("%s", &query)))
}

fn looks_like_host(entry: &str) -> bool {
    if entry.chars().any(char::is_whitespace) {
        return false;
    }
    let host = entry.split(['/', '?', '#']).next().unwrap_or(entry);
    let name = host.rsplit_once(':').map_or(host, |(name, port)| {
        if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) {
            name
        } else {
            host
        }
    });
    if name.eq_ignore_ascii_case("localhost") {
        return true;
    }
    name.contains('.') && !name.starts_with('.') && !name.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Option<Resolved> {
        resolve_entry(text, DEFAULT_SEARCH_TEMPLATE)
    }

    #[test]
    fn blank_entry_resolves_to_nothing() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
    }

    #[test]
    fn explicit_scheme_is_kept() {
        assert_eq!(
            resolve("https://example.org/path"),
            Some(Resolved::Url("https://example.org/path".into()))
        );
        assert_eq!(
            resolve("HTTP://Example.org"),
            Some(Resolved::Url("HTTP://Example.org".into()))
        );
        assert_eq!(resolve("about:blank"), Some(Resolved::Url("about:blank".into())));
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(
            resolve("  google.com  "),
            Some(Resolved::Url("http://google.com".into()))
        );
        assert_eq!(
            resolve("news.ycombinator.com/item?id=1"),
            Some(Resolved::Url("http://news.ycombinator.com/item?id=1".into()))
        );
    }

    #[test]
    fn localhost_with_port_is_a_host() {
        assert_eq!(
            resolve("localhost:8080"),
            Some(Resolved::Url("http://localhost:8080".into()))
        );
    }

    #[test]
    fn words_become_search() {
        assert_eq!(
            resolve("privacy browser"),
            Some(Resolved::Search(
                "https://duckduckgo.com/?q=privacy%20browser".into()
            ))
        );
        assert_eq!(
            resolve("focus"),
            Some(Resolved::Search("https://duckduckgo.com/?q=focus".into()))
        );
    }

    #[test]
    fn search_query_is_percent_encoded() {
        let resolved = resolve_entry("a&b=c", "https://search.example/?q=%s").unwrap();
        assert_eq!(resolved.as_str(), "https://search.example/?q=a%26b%3Dc");
    }

    #[test]
    fn dots_at_edges_are_not_hosts() {
        assert!(matches!(resolve(".com"), Some(Resolved::Search(_))));
        assert!(matches!(resolve("end."), Some(Resolved::Search(_))));
    }
}
