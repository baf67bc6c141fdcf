//! HTML to visible text extraction.

use scraper::{ElementRef, Html};

/// Elements whose contents never render as text.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start a new line of text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "title", "tr", "ul",
];

/// Strip markup from `html` and return its visible text.
///
/// Text inside inline markup is joined as written, so `数据<b>分</b>析`
/// stays one run. Block elements break lines; lines are trimmed and blank
/// ones dropped. Contents of `script`, `style`, `noscript` and `template`
/// are skipped.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);
    push_visible_text(doc.root_element(), &mut raw);

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_visible_text(el: ElementRef<'_>, out: &mut String) {
    let name = el.value().name();
    if INVISIBLE_ELEMENTS.contains(&name) {
        return;
    }
    let block = BLOCK_ELEMENTS.contains(&name);
    if block {
        out.push('\n');
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            push_visible_text(child_el, out);
        }
    }
    if block {
        out.push('\n');
    }
}
