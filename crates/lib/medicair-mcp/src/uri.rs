//! Locator for the virtual `ui://` widget resource.
//!
//! Different transports hand the same logical URI to the server in
//! different encodings, so classification tries a canonical parse
//! first and widens from there; a miss on every strategy means the URI
//! is not a UI resource. The goal is false-negative avoidance, not
//! strictness.

/// Scheme prefix for virtual UI resources.
pub const UI_SCHEME_PREFIX: &str = "ui://";

/// Well-known filename of the query-results widget.
pub const WIDGET_FILENAME: &str = "query-results.html";

/// Classifies `uri` and extracts the logical widget path.
///
/// Returns `None` when the URI is not a UI resource, including the
/// degenerate case where a recognized scheme carries an empty path.
#[must_use]
pub fn parse_ui_uri(uri: &str) -> Option<String> {
    let raw = uri
        .strip_prefix(UI_SCHEME_PREFIX)
        .map(ToString::to_string)
        .or_else(|| structured_scheme_path(uri))
        .or_else(|| sniffed_path(uri))?;

    let normalized = raw.strip_prefix('/').unwrap_or(&raw);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

/// Splits `scheme:rest`, accepting both `ui://...` spellings and the
/// collapsed `ui:...` / `ui:/...` forms some URI objects produce when
/// the first path segment lands in the host position.
fn structured_scheme_path(uri: &str) -> Option<String> {
    let (scheme, rest) = uri.split_once(':')?;
    if scheme != "ui" {
        return None;
    }
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    Some(rest.to_string())
}

/// Last-resort content sniff, kept deliberately for transports that
/// mangle the scheme entirely. Matches on the widget filename anywhere
/// in the string and takes whatever follows the scheme separator.
fn sniffed_path(uri: &str) -> Option<String> {
    if !uri.contains(WIDGET_FILENAME) {
        return None;
    }
    let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    Some(rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::parse_ui_uri;

    const WIDGET_PATH: &str = "widget/query-results.html";

    #[test]
    fn prefix_form_is_recognized() {
        assert_eq!(
            parse_ui_uri("ui://widget/query-results.html").as_deref(),
            Some(WIDGET_PATH)
        );
    }

    #[test]
    fn collapsed_scheme_forms_normalize_to_the_same_path() {
        assert_eq!(
            parse_ui_uri("ui:widget/query-results.html").as_deref(),
            Some(WIDGET_PATH)
        );
        assert_eq!(
            parse_ui_uri("ui:/widget/query-results.html").as_deref(),
            Some(WIDGET_PATH)
        );
    }

    #[test]
    fn filename_sniff_recovers_mangled_schemes() {
        assert_eq!(
            parse_ui_uri("resource://widget/query-results.html").as_deref(),
            Some(WIDGET_PATH)
        );
        assert_eq!(
            parse_ui_uri("widget/query-results.html").as_deref(),
            Some(WIDGET_PATH)
        );
    }

    #[test]
    fn unrelated_uris_are_rejected() {
        assert_eq!(parse_ui_uri("foo://bar"), None);
        assert_eq!(parse_ui_uri("https://example.com/page.html"), None);
    }

    #[test]
    fn empty_paths_are_not_a_match() {
        assert_eq!(parse_ui_uri("ui://"), None);
        assert_eq!(parse_ui_uri("ui:/"), None);
    }
}
