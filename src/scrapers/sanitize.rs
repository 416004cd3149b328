//! Promotional-content sanitizer for extracted page regions.
//!
//! The parsed tree is never mutated. Cleaning happens while re-serializing a
//! region: denylisted subtrees are skipped outright, and because rendering is
//! bottom-up, a container whose children were all skipped ends up with no
//! visible text and is dropped with them. Root-relative link and image URLs
//! are rewritten to absolute ones against the configured origin on the way
//! out.
//!
//! Sanitizing already-sanitized markup is a fixed point: a second pass finds
//! nothing left to remove and rewrites no URL twice.

use std::borrow::Cow;

use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

use crate::config::Config;

/// Classes marking a wholly promotional subtree.
const DENY_CLASSES: &[&str] = &["recommended-reads", "excerpt-from"];

/// Substrings of promotional link destinations.
const DENY_HREFS: &[&str] = &["catholiccompany", "referral"];

/// Glyph used as a bullet in promotional link lists.
const PROMO_GLYPH: &str = "\u{227b}";

/// Phrases marking a promotional link by its visible text.
const DENY_LINK_TEXT: &[&str] = &[PROMO_GLYPH, "recommended for you", "find a devotional"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

struct Rendered {
    html: String,
    text: String,
}

/// Serialize `el` with promotional content removed and URLs absolutized.
///
/// Never returns nothing: when the cleanup removes the element entirely, the
/// original serialization is returned unchanged so a degenerate region still
/// produces output.
pub fn sanitize(el: ElementRef<'_>, cfg: &Config) -> String {
    let origin = cfg.origin();
    match render_element(el, &origin) {
        Some(rendered) => rendered.html,
        None => el.html(),
    }
}

/// Serialize `el` verbatim, rewriting root-relative URLs only.
pub fn rewrite_urls(el: ElementRef<'_>, cfg: &Config) -> String {
    let origin = cfg.origin();
    let mut out = String::new();
    render_verbatim(el, &origin, &mut out);
    out
}

/// Re-apply the URL absolutization across an assembled fragment.
///
/// Regions fix their own URLs as they render; this whole-output pass catches
/// anything a region-local fixup missed.
pub fn absolutize(fragment: &str, cfg: &Config) -> String {
    let origin = cfg.origin();
    let doc = Html::parse_fragment(fragment);
    let mut out = String::new();
    for child in doc.root_element().children() {
        match child.value() {
            Node::Text(t) => {
                let s: &str = &t.text;
                out.push_str(&html_escape::encode_text(s));
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    render_verbatim(el, &origin, &mut out);
                }
            }
            _ => {}
        }
    }
    out
}

fn render_element(el: ElementRef<'_>, origin: &str) -> Option<Rendered> {
    let element = el.value();
    let name = element.name();

    if classes_of(element).any(|class| DENY_CLASSES.contains(&class)) {
        return None;
    }
    if name == "a" {
        if classes_of(element).any(|class| class == "button") {
            return None;
        }
        let href = element.attr("href").unwrap_or_default().to_lowercase();
        if DENY_HREFS.iter().any(|bad| href.contains(bad)) {
            return None;
        }
    }

    let inner = render_children(el, origin);
    let visible = inner.text.to_lowercase();
    if name == "a" && DENY_LINK_TEXT.iter().any(|bad| visible.contains(bad)) {
        return None;
    }
    if name == "li" && (visible.contains(PROMO_GLYPH) || visible.contains("recommended for you")) {
        return None;
    }
    // Cascading cleanup: block/list containers emptied by the rules above go too.
    if (name == "div" || name == "ul") && visible.trim().is_empty() {
        return None;
    }

    let mut html = String::new();
    html.push('<');
    html.push_str(name);
    for (attr, value) in element.attrs() {
        push_attr(&mut html, name, attr, value, origin);
    }
    html.push('>');
    if !VOID_ELEMENTS.contains(&name) {
        html.push_str(&inner.html);
        html.push_str("</");
        html.push_str(name);
        html.push('>');
    }
    Some(Rendered {
        html,
        text: inner.text,
    })
}

fn render_children(el: ElementRef<'_>, origin: &str) -> Rendered {
    let mut html = String::new();
    let mut text = String::new();
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                let s: &str = &t.text;
                html.push_str(&html_escape::encode_text(s));
                text.push_str(s);
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if let Some(rendered) = render_element(child_el, origin) {
                        html.push_str(&rendered.html);
                        text.push_str(&rendered.text);
                    }
                }
            }
            _ => {}
        }
    }
    Rendered { html, text }
}

fn render_verbatim(el: ElementRef<'_>, origin: &str, out: &mut String) {
    let element = el.value();
    let name = element.name();
    out.push('<');
    out.push_str(name);
    for (attr, value) in element.attrs() {
        push_attr(out, name, attr, value, origin);
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&name) {
        return;
    }
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                let s: &str = &t.text;
                out.push_str(&html_escape::encode_text(s));
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    render_verbatim(child_el, origin, out);
                }
            }
            _ => {}
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn classes_of<'a>(element: &'a Element) -> impl Iterator<Item = &'a str> {
    element.attr("class").unwrap_or_default().split_whitespace()
}

fn push_attr(out: &mut String, element: &str, attr: &str, value: &str, origin: &str) {
    let value = absolutized(element, attr, value, origin);
    out.push(' ');
    out.push_str(attr);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(&*value));
    out.push('"');
}

fn absolutized<'a>(element: &str, attr: &str, value: &'a str, origin: &str) -> Cow<'a, str> {
    let rewritable = (element == "a" && attr == "href") || (element == "img" && attr == "src");
    if rewritable && value.starts_with('/') {
        Cow::Owned(format!("{origin}{value}"))
    } else {
        Cow::Borrowed(value)
    }
}
