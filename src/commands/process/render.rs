use std::sync::LazyLock;

use regex::Regex;

use super::classify::is_heading;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[\u{2022}\-*]|\d+\.)\s+").expect("list marker regex compiles"));

pub(crate) fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Renders extracted text as reader-facing HTML. Headings become `<h2>`,
/// bullet and numbered lines become `<li>` items inside a `<ul>` (with the
/// marker stripped), everything else becomes `<p>`. An open list is closed
/// whenever a non-list line appears and at end of input.
pub(crate) fn text_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut in_list = false;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if is_heading(line) {
            if in_list {
                html.push_str("</ul>");
                in_list = false;
            }
            html.push_str("<h2>");
            html.push_str(&escape_html(line));
            html.push_str("</h2>");
        } else if let Some(found) = LIST_MARKER.find(line) {
            if !in_list {
                html.push_str("<ul>");
                in_list = true;
            }
            html.push_str("<li>");
            html.push_str(&escape_html(&line[found.end()..]));
            html.push_str("</li>");
        } else {
            if in_list {
                html.push_str("</ul>");
                in_list = false;
            }
            html.push_str("<p>");
            html.push_str(&escape_html(line));
            html.push_str("</p>");
        }
    }

    if in_list {
        html.push_str("</ul>");
    }

    html
}
