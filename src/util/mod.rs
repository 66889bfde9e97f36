/// Strip HTML tags from a fragment, keeping only text content.
///
/// An unterminated tag at the end of the fragment is dropped as well.
pub(crate) fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Recover a plain author name from an author region's markup: tags and
/// every literal `": "` separator are removed.
pub(crate) fn strip_author_markup(html: &str) -> String {
    strip_tags(html).replace(": ", "")
}

/// First `href="…"` attribute value in the fragment, or an empty string
/// when no anchor is present.
pub(crate) fn extract_href(html: &str) -> String {
    let Some(start) = html.find("href=\"") else {
        return String::new();
    };
    let rest = &html[start + "href=\"".len()..];
    match rest.find('"') {
        Some(end) => rest[..end].to_string(),
        None => rest.to_string(),
    }
}

/// Drop the single trailing `<br>` the editor leaves behind on edited
/// bodies. Only one is removed, and only at the very end.
pub(crate) fn strip_trailing_br(html: &str) -> String {
    html.strip_suffix("<br>").unwrap_or(html).to_string()
}

/// Fragment part of a URL (`…#frag`), if any.
pub(crate) fn url_fragment(url: &str) -> Option<&str> {
    url.split_once('#')
        .map(|(_, frag)| frag)
        .filter(|f| !f.is_empty())
}
