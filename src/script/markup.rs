//! Slide markup preparation.
//!
//! Every slide is rendered as one standalone document. Complete documents get a scaling style
//! injected into their head; fragments are wrapped in a neutral shell first. Slides without
//! usable markup are replaced by a placeholder asking for regeneration.

use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::config::TimingMode;

/// Whether a markup string is a complete document or a fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupKind {
    /// Has a document type declaration or a root `<html>` element.
    Document,
    /// Anything else; must be wrapped before rendering.
    Fragment,
}

impl MarkupKind {
    /// Classify `html`.
    pub fn detect(html: &str) -> Self {
        let lower = html.to_ascii_lowercase();
        if lower.contains("<!doctype") || lower.contains("<html") {
            Self::Document
        } else {
            Self::Fragment
        }
    }
}

/// Keeps the fixed-size canvas from reflowing or clipping once the host scales the body.
pub const SCALING_STYLE: &str = "<style data-slidereel=\"scale\">\
html, body { margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; }\
body { transform-origin: top left; position: absolute; top: 0; left: 0; }\
</style>";

/// Holds `element-N` reveals until the host marks them revealed.
pub const CLOCK_HOLD_STYLE: &str = "<style data-slidereel=\"hold\">\
[class^=\"element-\"], [class*=\" element-\"] { animation-play-state: paused !important; visibility: hidden; }\
.slidereel-revealed { animation-play-state: running !important; animation-delay: 0ms !important; visibility: visible; }\
.slidereel-held .slidereel-revealed { animation-play-state: paused !important; }\
</style>";

/// Class the host adds to an `element-N` node once its cue is due.
pub const REVEALED_CLASS: &str = "slidereel-revealed";

/// Class the host adds to the body while playback is paused.
pub const HELD_CLASS: &str = "slidereel-held";

static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("static regex"));
static HTML_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").expect("static regex"));

/// Build the document the rendering surface should load for `html`.
///
/// `html` must be non-blank; blank markup is handled by [`placeholder_document`].
pub fn prepare_document(html: &str, timing: TimingMode) -> String {
    let styles = styles_for(timing);
    match MarkupKind::detect(html) {
        MarkupKind::Document => inject_head_styles(html, &styles),
        MarkupKind::Fragment => wrap_fragment(html, &styles),
    }
}

fn styles_for(timing: TimingMode) -> String {
    match timing {
        TimingMode::ClockDriven => format!("{SCALING_STYLE}{CLOCK_HOLD_STYLE}"),
        TimingMode::DocumentTimers => SCALING_STYLE.to_owned(),
    }
}

/// Insert `styles` right before the first closing head tag.
///
/// Documents without a head get one after the `<html>` start tag; documents with neither get the
/// styles prepended.
pub fn inject_head_styles(doc: &str, styles: &str) -> String {
    if let Some(m) = HEAD_CLOSE.find(doc) {
        let mut out = String::with_capacity(doc.len() + styles.len());
        out.push_str(&doc[..m.start()]);
        out.push_str(styles);
        out.push_str(&doc[m.start()..]);
        return out;
    }
    if let Some(m) = HTML_OPEN.find(doc) {
        let mut out = String::with_capacity(doc.len() + styles.len() + 13);
        out.push_str(&doc[..m.end()]);
        out.push_str("<head>");
        out.push_str(styles);
        out.push_str("</head>");
        out.push_str(&doc[m.end()..]);
        return out;
    }
    format!("{styles}{doc}")
}

/// Wrap a fragment in a minimal document with a neutral background.
pub fn wrap_fragment(fragment: &str, styles: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\
* {{ margin: 0; padding: 0; box-sizing: border-box; }}\
body {{ width: 100%; height: 100vh; display: flex; align-items: center; justify-content: center; \
background: #f9f9f9; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }}\
</style>\n{styles}\n</head>\n<body>\n{fragment}\n</body>\n</html>\n"
    )
}

/// Placeholder shown for a slide whose markup is missing or could not be loaded.
///
/// Always a complete, non-empty document with legible text.
pub fn placeholder_document(slide_id: u32, title: &str) -> String {
    let title = if title.trim().is_empty() {
        format!("Slide {slide_id}")
    } else {
        escape_html(title.trim())
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\
* {{ margin: 0; padding: 0; box-sizing: border-box; }}\
html, body {{ width: 100%; height: 100%; overflow: hidden; }}\
body {{ display: flex; align-items: center; justify-content: center; \
background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; \
font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }}\
.message {{ text-align: center; max-width: 1200px; }}\
h1 {{ font-size: 96px; margin-bottom: 48px; }}\
p {{ font-size: 40px; opacity: 0.9; }}\
</style>\n</head>\n<body>\n<div class=\"message\">\n<h1>{title}</h1>\n\
<p>This slide needs regeneration.</p>\n</div>\n</body>\n</html>\n"
    )
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/script/markup.rs"]
mod tests;
