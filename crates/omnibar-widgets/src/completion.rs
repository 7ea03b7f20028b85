//! Completion sources for [`InlineCompletion`](crate::inline_completion::InlineCompletion).
//!
//! A [`CompletionProvider`] is a synchronous lookup from the entered text to a
//! full suggested string. Any `Fn(&str) -> Option<String>` is a provider;
//! [`DomainCompletion`] is the browser-style source that completes host names
//! from a built-in list of popular domains and a user-managed list of custom
//! domains.

use tracing::trace;

/// Supplies a completion for the text typed so far.
///
/// Implementations must be pure and fast: the field calls this once per
/// insertion, on the thread delivering the edit. Return `None` when nothing
/// matches; failures are never surfaced as errors.
pub trait CompletionProvider {
    /// Return the full suggested text for `text`, if any.
    fn completion(&self, text: &str) -> Option<String>;
}

impl<F> CompletionProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn completion(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Errors from building or editing a domain list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainListError {
    /// A domain list contained no domains.
    #[error("domain list is empty")]
    Empty,
    /// The entry is not a usable host name.
    #[error("invalid domain: {domain:?}")]
    InvalidDomain {
        /// The rejected entry, as given.
        domain: String,
    },
    /// The domain is already in the custom list.
    #[error("duplicate domain: {domain}")]
    Duplicate {
        /// The normalized domain.
        domain: String,
    },
    /// A line of a domain list file is not a usable host name.
    #[error("line {line}: invalid domain {domain:?}")]
    InvalidLine {
        /// 1-based line number.
        line: usize,
        /// The rejected entry.
        domain: String,
    },
    /// The domain is not in the custom list.
    #[error("domain not found: {domain}")]
    NotFound {
        /// The normalized domain.
        domain: String,
    },
    /// A reorder index is past the end of the custom list.
    #[error("index {index} out of range for {len} custom domains")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of custom domains.
        len: usize,
    },
}

/// Popular domains offered when no custom domain matches.
pub const TOP_DOMAINS: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "wikipedia.org",
    "amazon.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "reddit.com",
    "yahoo.com",
    "ebay.com",
    "netflix.com",
    "bing.com",
    "microsoft.com",
    "apple.com",
    "mozilla.org",
    "github.com",
    "stackoverflow.com",
    "twitch.tv",
    "imdb.com",
    "paypal.com",
    "craigslist.org",
    "nytimes.com",
    "cnn.com",
    "bbc.co.uk",
    "espn.com",
    "duckduckgo.com",
    "wordpress.com",
    "tumblr.com",
    "pinterest.com",
    "dropbox.com",
    "spotify.com",
    "zoom.us",
    "office.com",
    "weather.com",
    "walmart.com",
    "etsy.com",
    "booking.com",
    "quora.com",
    "medium.com",
];

const SCHEMES: &[&str] = &["https://", "http://"];

/// Which domain lists [`DomainCompletion`] consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Complete from the top-domains list (default: true).
    pub top_domains: bool,
    /// Complete from the user's custom domains (default: true).
    pub custom_domains: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            top_domains: true,
            custom_domains: true,
        }
    }
}

/// Completes host names from custom and top domain lists.
///
/// Custom domains take priority over top domains. The query keeps its scheme
/// (`http://`, `https://`) and may start with `www.`; a domain matches when
/// it, or its `www.` form, starts with the rest of the query.
///
/// # Example
///
/// ```
/// use omnibar_widgets::completion::{CompletionProvider, DomainCompletion};
///
/// let mut domains = DomainCompletion::new();
/// domains.add_custom_domain("https://www.example.org/").unwrap();
///
/// assert_eq!(domains.completion("exa").as_deref(), Some("example.org"));
/// assert_eq!(domains.completion("www.goo").as_deref(), Some("www.google.com"));
/// assert_eq!(domains.completion("http://mozi").as_deref(), Some("http://mozilla.org"));
/// ```
#[derive(Debug, Clone)]
pub struct DomainCompletion {
    config: CompletionConfig,
    top: Vec<String>,
    custom: Vec<String>,
}

impl Default for DomainCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainCompletion {
    /// Create a provider with the built-in [`TOP_DOMAINS`] and no custom domains.
    pub fn new() -> Self {
        Self {
            config: CompletionConfig::default(),
            top: TOP_DOMAINS.iter().map(|d| d.to_string()).collect(),
            custom: Vec::new(),
        }
    }

    /// Set which lists are consulted.
    pub fn with_config(mut self, config: CompletionConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the top-domains list.
    pub fn with_top_domains(mut self, domains: Vec<impl Into<String>>) -> Self {
        self.top = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Current configuration.
    pub fn config(&self) -> CompletionConfig {
        self.config
    }

    /// Change which lists are consulted.
    pub fn set_config(&mut self, config: CompletionConfig) {
        self.config = config;
    }

    /// Replace the top-domains list, e.g. with one loaded from disk.
    pub fn set_top_domains(&mut self, domains: Vec<String>) {
        self.top = domains;
    }

    /// The top-domains list.
    pub fn top_domains(&self) -> &[String] {
        &self.top
    }

    /// The custom domains, in priority order.
    pub fn custom_domains(&self) -> &[String] {
        &self.custom
    }

    /// Add a custom domain at the end of the list.
    ///
    /// The entry is normalized first: surrounding whitespace, a scheme, a
    /// leading `www.` and a trailing `/` are removed and it is lower-cased.
    pub fn add_custom_domain(&mut self, domain: &str) -> Result<(), DomainListError> {
        let normalized = normalize_domain(domain).ok_or_else(|| DomainListError::InvalidDomain {
            domain: domain.to_string(),
        })?;
        if self.custom.contains(&normalized) {
            return Err(DomainListError::Duplicate { domain: normalized });
        }
        trace!(domain = %normalized, "custom domain added");
        self.custom.push(normalized);
        Ok(())
    }

    /// Remove a custom domain. The argument is normalized like
    /// [`add_custom_domain`](Self::add_custom_domain).
    pub fn remove_custom_domain(&mut self, domain: &str) -> Result<(), DomainListError> {
        let normalized = normalize_domain(domain).unwrap_or_else(|| domain.to_string());
        match self.custom.iter().position(|d| *d == normalized) {
            Some(index) => {
                self.custom.remove(index);
                Ok(())
            }
            None => Err(DomainListError::NotFound { domain: normalized }),
        }
    }

    /// Move the custom domain at `from` to position `to`.
    pub fn move_custom_domain(&mut self, from: usize, to: usize) -> Result<(), DomainListError> {
        let len = self.custom.len();
        for index in [from, to] {
            if index >= len {
                return Err(DomainListError::IndexOutOfRange { index, len });
            }
        }
        let domain = self.custom.remove(from);
        self.custom.insert(to, domain);
        Ok(())
    }

    /// Parse a domain list: one domain per line, blank lines and `#` comments
    /// ignored, duplicates dropped.
    pub fn parse_domain_list(text: &str) -> Result<Vec<String>, DomainListError> {
        let mut domains: Vec<String> = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            let domain = normalize_domain(entry).ok_or_else(|| DomainListError::InvalidLine {
                line: index + 1,
                domain: entry.to_string(),
            })?;
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
        if domains.is_empty() {
            return Err(DomainListError::Empty);
        }
        Ok(domains)
    }

    fn candidates(&self) -> impl Iterator<Item = &String> {
        let custom = self.config.custom_domains.then_some(self.custom.iter());
        let top = self.config.top_domains.then_some(self.top.iter());
        custom.into_iter().flatten().chain(top.into_iter().flatten())
    }
}

impl CompletionProvider for DomainCompletion {
    fn completion(&self, text: &str) -> Option<String> {
        if text.is_empty() || text.chars().any(char::is_whitespace) {
            return None;
        }
        let query = text.to_lowercase();
        let (scheme, rest) = split_scheme(&query);
        if rest.is_empty() {
            return None;
        }

        let matched = self
            .candidates()
            .find(|domain| domain.starts_with(rest))
            .cloned()
            .or_else(|| {
                self.candidates()
                    .map(|domain| format!("www.{domain}"))
                    .find(|domain| domain.starts_with(rest))
            })?;
        trace!(query = %text, %matched, "domain completion");
        Some(format!("{scheme}{matched}"))
    }
}

fn split_scheme(text: &str) -> (&str, &str) {
    for scheme in SCHEMES {
        if let Some(rest) = text.strip_prefix(scheme) {
            return (*scheme, rest);
        }
    }
    ("", text)
}

fn normalize_domain(entry: &str) -> Option<String> {
    let lowered = entry.trim().to_lowercase();
    let (_, rest) = split_scheme(&lowered);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let domain = rest.trim_end_matches('/');

    let valid = !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && !domain.chars().any(|c| c.is_whitespace() || c == '/');
    valid.then(|| domain.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_top_domain_prefix() {
        let domains = DomainCompletion::new();
        assert_eq!(domains.completion("goo").as_deref(), Some("google.com"));
        assert_eq!(domains.completion("red").as_deref(), Some("reddit.com"));
    }

    #[test]
    fn query_is_matched_case_insensitively() {
        let domains = DomainCompletion::new();
        assert_eq!(domains.completion("GiT").as_deref(), Some("github.com"));
    }

    #[test]
    fn direct_match_wins_over_www_form() {
        let domains = DomainCompletion::new();
        assert_eq!(domains.completion("w").as_deref(), Some("wikipedia.org"));
        assert_eq!(domains.completion("ww").as_deref(), Some("www.google.com"));
    }

    #[test]
    fn www_and_scheme_prefixes_are_preserved() {
        let domains = DomainCompletion::new();
        assert_eq!(
            domains.completion("www.mozi").as_deref(),
            Some("www.mozilla.org")
        );
        assert_eq!(
            domains.completion("https://git").as_deref(),
            Some("https://github.com")
        );
        assert_eq!(
            domains.completion("http://www.red").as_deref(),
            Some("http://www.reddit.com")
        );
    }

    #[test]
    fn whitespace_or_empty_query_has_no_completion() {
        let domains = DomainCompletion::new();
        assert_eq!(domains.completion(""), None);
        assert_eq!(domains.completion("goo gle"), None);
        assert_eq!(domains.completion("https://"), None);
    }

    #[test]
    fn unknown_prefix_has_no_completion() {
        let domains = DomainCompletion::new();
        assert_eq!(domains.completion("zzzz"), None);
    }

    #[test]
    fn custom_domains_take_priority() {
        let mut domains = DomainCompletion::new();
        domains.add_custom_domain("gooseberry.farm").unwrap();
        assert_eq!(domains.completion("goo").as_deref(), Some("gooseberry.farm"));
        assert_eq!(domains.completion("goog").as_deref(), Some("google.com"));
    }

    #[test]
    fn config_disables_lists() {
        let mut domains = DomainCompletion::new().with_config(CompletionConfig {
            top_domains: false,
            custom_domains: true,
        });
        assert_eq!(domains.completion("goo"), None);

        domains.add_custom_domain("example.org").unwrap();
        assert_eq!(domains.completion("ex").as_deref(), Some("example.org"));

        domains.set_config(CompletionConfig {
            top_domains: true,
            custom_domains: false,
        });
        assert_eq!(domains.completion("exa"), None);
    }

    #[test]
    fn add_custom_domain_normalizes() {
        let mut domains = DomainCompletion::new();
        domains.add_custom_domain("  HTTPS://www.Example.ORG/  ").unwrap();
        assert_eq!(domains.custom_domains(), ["example.org"]);
    }

    #[test]
    fn add_custom_domain_rejects_invalid_and_duplicates() {
        let mut domains = DomainCompletion::new();
        assert!(matches!(
            domains.add_custom_domain("not a domain"),
            Err(DomainListError::InvalidDomain { .. })
        ));
        assert!(matches!(
            domains.add_custom_domain("localhost"),
            Err(DomainListError::InvalidDomain { .. })
        ));
        domains.add_custom_domain("example.org").unwrap();
        assert_eq!(
            domains.add_custom_domain("www.example.org"),
            Err(DomainListError::Duplicate {
                domain: "example.org".into()
            })
        );
    }

    #[test]
    fn remove_and_reorder_custom_domains() {
        let mut domains = DomainCompletion::new();
        for d in ["a.com", "b.com", "c.com"] {
            domains.add_custom_domain(d).unwrap();
        }
        domains.move_custom_domain(2, 0).unwrap();
        assert_eq!(domains.custom_domains(), ["c.com", "a.com", "b.com"]);

        domains.remove_custom_domain("https://a.com").unwrap();
        assert_eq!(domains.custom_domains(), ["c.com", "b.com"]);

        assert_eq!(
            domains.remove_custom_domain("a.com"),
            Err(DomainListError::NotFound {
                domain: "a.com".into()
            })
        );
        assert_eq!(
            domains.move_custom_domain(0, 5),
            Err(DomainListError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn parse_domain_list_skips_comments_and_duplicates() {
        let text = "# favourites\nexample.org\n\n  www.Example.org\nrust-lang.org\n";
        let domains = DomainCompletion::parse_domain_list(text).unwrap();
        assert_eq!(domains, vec!["example.org", "rust-lang.org"]);
    }

    #[test]
    fn parse_domain_list_reports_line_of_bad_entry() {
        let text = "example.org\nnot valid\n";
        assert_eq!(
            DomainCompletion::parse_domain_list(text),
            Err(DomainListError::InvalidLine {
                line: 2,
                domain: "not valid".into()
            })
        );
    }

    #[test]
    fn parse_empty_domain_list_fails() {
        assert_eq!(
            DomainCompletion::parse_domain_list("# nothing here\n\n"),
            Err(DomainListError::Empty)
        );
    }

    #[test]
    fn closures_are_providers() {
        let provider = |text: &str| (text == "a").then(|| "abc".to_string());
        assert_eq!(provider.completion("a").as_deref(), Some("abc"));
        assert_eq!(provider.completion("b"), None);
    }
}
