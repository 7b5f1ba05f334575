//! Escaping for caller supplied path segments.

use url::form_urlencoded;

/// Percent-encode `raw` so it occupies exactly one path segment.
///
/// Everything but ASCII alphanumerics and `*-._` is escaped, so a `/` in an
/// ID can never reach a neighbouring endpoint. Spaces become `%20`.
///
/// Segments made only of dots survive unchanged; the transport refuses to
/// resolve them.
#[must_use]
pub fn path_segment(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Whether `segment` would be dropped or collapsed by URL resolution.
pub(crate) fn is_unresolvable(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "" | "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
    )
}
