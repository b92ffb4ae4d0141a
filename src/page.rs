use std::time::Duration;

use log::debug;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

/// Fetches a webpage and reduces it to the visible text of its `<body>`.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; RecipeExtractorBot/1.0)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch `url` and return the visible body text of the document.
    ///
    /// Fails when the response status is not successful or when the fetched
    /// content has no usable `<body>` (e.g. it is not a full HTML page).
    pub async fn fetch_text(&self, url: &str) -> Result<String, ExtractError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);

        body_text(&html).ok_or(ExtractError::NoBody)
    }
}

/// Extract the visible inner text of the `<body>` element.
///
/// Markup is stripped; `<script>`, `<style>` and `<noscript>` contents are
/// excluded; whitespace inside `<pre>` is preserved literally while all other
/// whitespace runs collapse to a single space. Block-level elements and
/// `<br>` produce line breaks.
///
/// Returns `None` when the document yields no body text. The HTML parser
/// synthesizes a `<body>` for fragments, so a missing body manifests here as
/// an empty one.
pub fn body_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("body").unwrap();
    let body = document.select(&selector).next()?;

    let mut out = String::new();
    append_text(body, &mut out, false);

    let text = out.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

const SKIPPED_TAGS: [&str; 3] = ["script", "style", "noscript"];

fn append_text(el: ElementRef, out: &mut String, in_pre: bool) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            if in_pre {
                out.push_str(text);
            } else {
                push_collapsed(out, text);
            }
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if SKIPPED_TAGS.contains(&name) {
                continue;
            }
            if name == "br" {
                out.push('\n');
                continue;
            }
            let block = is_block(name);
            if block {
                end_line(out);
            }
            append_text(child_el, out, in_pre || name == "pre");
            if block {
                end_line(out);
            }
        }
    }
}

/// Append `text` with whitespace runs collapsed to a single space.
fn push_collapsed(out: &mut String, text: &str) {
    let mut last_was_space = out.is_empty() || out.ends_with(char::is_whitespace);
    for c in text.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
}

/// Terminate the current line, dropping trailing spaces first.
fn end_line(out: &mut String) {
    while out.ends_with(' ') {
        out.pop();
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "dd"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "td"
            | "th"
            | "tr"
            | "ul"
    )
}
