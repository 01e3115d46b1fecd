// HTML generation helpers shared by the page renderer and the card renderer

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escaped relative URL for a catalog asset path.
/// `prefix` is `"../"` from detail pages and `""` from the home page.
pub fn asset_href(prefix: &str, path: &str) -> String {
    html_escape(&format!("{}{}", prefix, path))
}

/// File stem for a theme's detail page. Path separators are escaped so every
/// id stays a single file inside the pages directory; `%` is escaped first so
/// distinct ids keep distinct stems.
pub fn page_stem(id: &str) -> String {
    id.replace('%', "%25")
        .replace('/', "%2F")
        .replace('\\', "%5C")
}

/// Link from the site root to a theme's detail page
pub fn page_link(pages_dir: &str, id: &str) -> String {
    format!("{}/{}.html", pages_dir, urlencoding::encode(&page_stem(id)))
}

/// `<span class="badge ...">` with escaped text
pub fn badge(class: &str, text: &str) -> String {
    format!(
        r#"<span class="badge {}">{}</span>"#,
        class,
        html_escape(text)
    )
}

/// `<option>` list with an "all" sentinel first
pub fn select_options(values: &[String]) -> String {
    let mut html = String::from(r#"<option value="all">All</option>"#);
    for value in values {
        let escaped = html_escape(value);
        html.push_str(&format!(
            "\n            <option value=\"{}\">{}</option>",
            escaped, escaped
        ));
    }
    html
}
