use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html};

pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, html: &str) -> String;
}

/// Returns rendered HTML untouched. Only for rendering services you control.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughSanitizer;

impl Sanitizer for PassthroughSanitizer {
    fn sanitize(&self, html: &str) -> String {
        html.to_string()
    }
}

/// Allowlist re-serializer for rendered markdown:
/// - keeps the elements GitHub-flavoured markdown produces
/// - drops scripting/embedding elements together with their content
/// - unwraps any other element, keeping its children
/// - keeps only allowlisted attributes, emitted in a fixed order
/// - prefixes ids with `user-content-` unless they already carry it
/// - drops URLs whose scheme is not http, https or mailto.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowlistSanitizer;

const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "code", "dd", "del", "details", "div", "dl", "dt",
    "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "input", "ins", "kbd", "li",
    "mark", "ol", "p", "picture", "pre", "q", "rp", "rt", "ruby", "s", "samp", "section",
    "source", "span", "strike", "strong", "sub", "summary", "sup", "table", "tbody", "td",
    "tfoot", "th", "thead", "tr", "tt", "ul", "var",
];

const DROPPED_SUBTREES: &[&str] = &[
    "applet", "base", "button", "embed", "form", "frame", "frameset", "head", "iframe", "link",
    "math", "meta", "noscript", "object", "script", "select", "style", "svg", "template",
    "textarea", "title",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "source"];

const ALLOWED_ATTRS: &[&str] = &[
    "id", "class", "href", "src", "srcset", "alt", "title", "align", "width", "height", "lang",
    "dir", "colspan", "rowspan", "start", "type", "checked", "disabled", "open", "cite",
    "datetime", "media", "rel", "aria-label", "aria-hidden",
];

const URL_ATTRS: &[&str] = &["href", "src", "cite"];

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// GitHub namespaces user-controlled ids so they cannot shadow page globals.
const ID_PREFIX: &str = "user-content-";

impl Sanitizer for AllowlistSanitizer {
    fn sanitize(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        let mut out = String::with_capacity(html.len());
        for child in fragment.root_element().children() {
            visit_node(child, &mut out);
        }
        out
    }
}

fn visit_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => escape_text(text, out),
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                visit_element(element, out);
            }
        }
        Node::Comment(_) | Node::Doctype(_) => {}
        _ => {
            for child in node.children() {
                visit_node(child, out);
            }
        }
    }
}

fn visit_element(element: ElementRef<'_>, out: &mut String) {
    let tag = element.value().name().to_ascii_lowercase();
    if DROPPED_SUBTREES.contains(&tag.as_str()) {
        return;
    }
    if !ALLOWED_TAGS.contains(&tag.as_str()) {
        visit_children(element, out);
        return;
    }
    // Task-list checkboxes are the only inputs markdown produces.
    if tag == "input" && !element.value().attr("type").is_some_and(is_checkbox) {
        return;
    }

    out.push('<');
    out.push_str(&tag);
    for name in ALLOWED_ATTRS {
        let Some(value) = element.value().attr(name) else {
            continue;
        };
        if URL_ATTRS.contains(name) && !is_safe_url(value) {
            continue;
        }
        if *name == "srcset" && !value.split(',').all(is_safe_srcset_candidate) {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        if *name == "id" && !value.starts_with(ID_PREFIX) {
            out.push_str(ID_PREFIX);
        }
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&tag.as_str()) {
        return;
    }
    visit_children(element, out);
    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn visit_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        visit_node(child, out);
    }
}

fn is_checkbox(kind: &str) -> bool {
    kind.eq_ignore_ascii_case("checkbox")
}

fn is_safe_srcset_candidate(candidate: &str) -> bool {
    candidate.split_whitespace().next().map_or(true, is_safe_url)
}

/// Relative references and fragments are fine; absolute URLs need a safe scheme.
fn is_safe_url(raw: &str) -> bool {
    // Browsers ignore embedded whitespace and control characters in schemes.
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.find(|c: char| matches!(c, ':' | '/' | '?' | '#')) {
        Some(idx) if compact[idx..].starts_with(':') => {
            SAFE_SCHEMES.contains(&&compact[..idx])
        }
        _ => true,
    }
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub(crate) fn escape_attr(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
