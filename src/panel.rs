use once_cell::sync::Lazy;
use regex::Regex;

/// Detail-view projection for one node: pure data, no retained handlers. The
/// toggle affordance reads the current panel target from application state at
/// invocation time (see `App::toggle_current`).
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub content_html: String,
    pub completed: bool,
}

/// Renders node content for the panel. Tries the markdown renderer first
/// (feature `markdown`), then the regex mini renderer; if neither produces
/// anything for non-empty input the raw text is shown as a paragraph, so the
/// panel is never empty and a bad document never escapes the handler.
pub fn render_content(content: &str) -> String {
    #[cfg(feature = "markdown")]
    {
        let html = markdown_html(content);
        if !html.trim().is_empty() {
            return html;
        }
    }

    let html = fallback_html(content);
    if html.trim().is_empty() && !content.trim().is_empty() {
        return format!("<p>{}</p>", escape_html(content));
    }
    html
}

pub fn placeholder_content(title: &str) -> String {
    format!("# {title}\n\nNo description available.")
}

#[cfg(feature = "markdown")]
fn markdown_html(content: &str) -> String {
    let parser = pulldown_cmark::Parser::new(content);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

static H3_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- (.*)$").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static EM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());

// Minimal markdown: the same substitutions the original viewer applied when
// no markdown library was available.
fn fallback_html(content: &str) -> String {
    let html = escape_html(content);
    let html = H3_RE.replace_all(&html, "<h3>$1</h3>");
    let html = H2_RE.replace_all(&html, "<h2>$1</h2>");
    let html = H1_RE.replace_all(&html, "<h1>$1</h1>");
    let html = LIST_RE.replace_all(&html, "<li>$1</li>");
    let html = BOLD_RE.replace_all(&html, "<strong>$1</strong>");
    let html = EM_RE.replace_all(&html, "<em>$1</em>");
    html.replace('\n', "<br>")
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
