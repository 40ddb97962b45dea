//! Email address rendering and reduction.

use std::sync::OnceLock;

use regex::Regex;

/// A sender or recipient as reported by the mail source.
///
/// # Examples
/// - `"Juan García <juan@ejemplo.com>"` → `display_name = "Juan García"`, `address = "juan@ejemplo.com"`
/// - `"user@example.com"` → `display_name = ""`, `address = "user@example.com"`
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAddress {
    /// Human-readable display name (may be empty).
    pub display_name: String,
    /// The bare email address (`user@domain`).
    pub address: String,
}

impl EmailAddress {
    /// Build from optional header components, trimming surrounding quotes.
    pub fn new(display_name: Option<&str>, address: Option<&str>) -> Self {
        Self {
            display_name: display_name.map(strip_quotes).unwrap_or_default(),
            address: address.map(|a| a.trim().to_string()).unwrap_or_default(),
        }
    }

    /// Format for display: `"Display Name <address>"` or just `"address"`.
    pub fn display(&self) -> String {
        if self.display_name.is_empty() {
            self.address.clone()
        } else if self.address.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} <{}>", self.display_name, self.address)
        }
    }

    /// `true` when neither a name nor an address is known.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_empty() && self.address.is_empty()
    }
}

/// Reduce `"Display Name <addr>"` to `addr`.
///
/// Takes the content of the first angle-bracket pair on the line. Strings
/// without one are returned unchanged.
pub fn bare_address(raw: &str) -> String {
    match angle_address_regex().captures(raw) {
        Some(caps) => caps[1].to_string(),
        None => raw.to_string(),
    }
}

fn angle_address_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[^<]*<([^>]+)>.*$").expect("valid address regex"))
}

/// Strip surrounding double-quotes and trim whitespace.
fn strip_quotes(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_address_from_display_form() {
        assert_eq!(bare_address("John <j@x.com>"), "j@x.com");
        assert_eq!(bare_address("\"Last, First\" <a@b.com>"), "a@b.com");
    }

    #[test]
    fn test_bare_address_without_brackets() {
        assert_eq!(bare_address("k@y.com"), "k@y.com");
        assert_eq!(bare_address("undisclosed-recipients"), "undisclosed-recipients");
    }

    #[test]
    fn test_bare_address_empty_brackets_kept() {
        assert_eq!(bare_address("Nobody <>"), "Nobody <>");
    }

    #[test]
    fn test_display_with_name() {
        let addr = EmailAddress::new(Some("Alice"), Some("alice@example.com"));
        assert_eq!(addr.display(), "Alice <alice@example.com>");
    }

    #[test]
    fn test_display_quoted_name() {
        let addr = EmailAddress::new(Some("\"Last, First\""), Some("a@b.com"));
        assert_eq!(addr.display(), "Last, First <a@b.com>");
    }

    #[test]
    fn test_display_without_name() {
        let addr = EmailAddress::new(None, Some("alice@example.com"));
        assert_eq!(addr.display(), "alice@example.com");
        assert!(!addr.is_empty());
        assert!(EmailAddress::new(None, None).is_empty());
    }
}
