//! Utility functions module

/// String utilities
pub mod string {
    use regex::Regex;
    use std::sync::LazyLock;

    static HTML_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

    /// Check if string is empty or blank
    #[must_use]
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }

    /// Remove every `<...>` tag, keeping the text between them
    #[must_use]
    pub fn strip_html_tags(text: &str) -> String {
        HTML_TAG.replace_all(text, "").into_owned()
    }

    /// Turn a search snippet (HTML with match highlighting) into plain text.
    /// Only `&quot;` is decoded.
    #[must_use]
    pub fn clean_snippet(snippet_html: &str) -> String {
        strip_html_tags(snippet_html).replace("&quot;", "\"")
    }
}

/// URL utilities
pub mod url {
    /// Percent-encode a URI component.
    ///
    /// Leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as-is; `urlencoding` escapes
    /// the marks `! ' ( ) *`, so they are put back.
    #[must_use]
    pub fn encode_uri_component(s: &str) -> String {
        urlencoding::encode(s)
            .replace("%21", "!")
            .replace("%27", "'")
            .replace("%28", "(")
            .replace("%29", ")")
            .replace("%2A", "*")
    }

    /// Build the canonical article URL for a page title
    #[must_use]
    pub fn build_page_url(base_url: &str, title: &str) -> String {
        let safe = encode_uri_component(&title.replace(' ', "_"));
        format!("{}/w/{safe}", base_url.trim_end_matches('/'))
    }
}

/// Search limit bounds
pub mod limit {
    /// Smallest accepted result count
    pub const MIN: i64 = 1;
    /// Largest accepted result count
    pub const MAX: i64 = 50;
    /// Result count used when the caller gives none
    pub const DEFAULT: i64 = 10;

    /// Clamp a requested result count into `[MIN, MAX]`
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamp(limit: i64) -> u32 {
        limit.clamp(MIN, MAX) as u32
    }
}
