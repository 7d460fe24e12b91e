//! Page loading: fetch a URL and reduce the response to a [`Page`].

pub mod http;
#[cfg(feature = "tls-rustls")]
pub mod tls;

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use kiosk_types::config::SurfaceConfig;
use kiosk_types::error::{KioskError, Result};
use url::Url;

use http::net_error;

/// Length of the text preview kept per page, in characters.
const PREVIEW_CHARS: usize = 600;

/// A bidirectional byte stream (plain TCP or TLS).
pub trait Connection: Read + Write {}

impl<T: Read + Write> Connection for T {}

/// Provides TLS client connections.
pub trait TlsProvider {
    /// Wrap `stream` in a TLS client session for `server_name`.
    fn connect_tls(&self, stream: TcpStream, server_name: &str) -> Result<Box<dyn Connection>>;
}

/// Network knobs for the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    pub user_agent: String,
    pub max_redirects: u8,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self::from(&SurfaceConfig::default())
    }
}

impl From<&SurfaceConfig> for LoaderOptions {
    fn from(cfg: &SurfaceConfig) -> Self {
        Self {
            user_agent: cfg.user_agent.clone(),
            max_redirects: cfg.max_redirects,
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            read_timeout: Duration::from_secs(cfg.read_timeout_secs),
        }
    }
}

/// A loaded page, reduced to what the kiosk displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub title: String,
    /// Visible text, whitespace-collapsed and truncated.
    pub text: String,
    /// Absolute http(s) link targets in document order, de-duplicated.
    pub links: Vec<String>,
}

/// Fetch `url` and summarize it. HTTP error statuses become
/// `KioskError::Surface("HTTP <code>")`.
pub fn load_page(
    url: &str,
    opts: &LoaderOptions,
    tls: Option<&dyn TlsProvider>,
    javascript: bool,
) -> Result<Page> {
    let parsed = Url::parse(url).map_err(|_| net_error("ERR_INVALID_URL"))?;
    let fetched = http::http_get(&parsed, opts, tls)?;
    if fetched.status >= 400 {
        return Err(KioskError::Surface(format!("HTTP {}", fetched.status)));
    }

    let body = String::from_utf8_lossy(&fetched.body);
    let is_html = fetched
        .content_type
        .as_deref()
        .is_none_or(|ct| ct.to_ascii_lowercase().contains("html"));
    let page = if is_html {
        summarize_html(&fetched.url, &body, javascript)
    } else {
        Page {
            url: fetched.url.to_string(),
            status: fetched.status,
            title: String::new(),
            text: preview(&collapse_whitespace(&body)),
            links: Vec::new(),
        }
    };
    Ok(Page {
        status: fetched.status,
        ..page
    })
}

/// Extract title, visible text and links from an HTML document.
///
/// `<script>` and `<style>` content is never visible;
/// `<noscript>` content is visible only when scripting is disabled.
pub fn summarize_html(base: &Url, html: &str, javascript: bool) -> Page {
    let mut title = String::new();
    let mut text = String::new();
    let mut links: Vec<String> = Vec::new();

    let mut hidden: Option<&'static str> = None;
    let mut in_title = false;
    let mut rest = html;

    while !rest.is_empty() {
        let Some(lt) = rest.find('<') else {
            push_text(&mut text, &mut title, in_title, hidden.is_none(), rest);
            break;
        };
        push_text(&mut text, &mut title, in_title, hidden.is_none(), &rest[..lt]);
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            rest = rest.find("-->").map_or("", |end| &rest[end + 3..]);
            continue;
        }
        let Some(gt) = rest.find('>') else {
            break;
        };
        let tag = &rest[1..gt];
        rest = &rest[gt + 1..];

        let closing = tag.starts_with('/');
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        if let Some(h) = hidden {
            if closing && name == h {
                hidden = None;
            }
            continue;
        }

        match (name.as_str(), closing) {
            ("script", false) => hidden = Some("script"),
            ("style", false) => hidden = Some("style"),
            ("noscript", false) if javascript => hidden = Some("noscript"),
            ("title", false) => in_title = true,
            ("title", true) => in_title = false,
            ("a", false) => {
                if let Some(href) = attr_value(tag, "href")
                    && let Ok(target) = base.join(&decode_entities(href))
                    && matches!(target.scheme(), "http" | "https")
                {
                    let target = target.to_string();
                    if !links.contains(&target) {
                        links.push(target);
                    }
                }
            },
            ("br" | "p" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6", _) => {
                text.push(' ');
            },
            _ => {},
        }
    }

    Page {
        url: base.to_string(),
        status: 200,
        title: collapse_whitespace(&decode_entities(&title)),
        text: preview(&collapse_whitespace(&decode_entities(&text))),
        links,
    }
}

fn push_text(text: &mut String, title: &mut String, in_title: bool, visible: bool, chunk: &str) {
    if in_title {
        title.push_str(chunk);
    } else if visible {
        text.push_str(chunk);
    }
}

/// Value of `name="..."`, `name='...'` or `name=bare` inside a tag.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let mut search = 0;
    while let Some(found) = lower[search..].find(name) {
        let start = search + found;
        search = start + name.len();
        let before_ok = start == 0 || lower.as_bytes()[start - 1].is_ascii_whitespace();
        let after = lower[search..].trim_start();
        if !before_ok || !after.starts_with('=') {
            continue;
        }
        let offset = tag.len() - after.len() + 1;
        let value = tag[offset..].trim_start();
        return match value.chars().next() {
            Some(q @ ('"' | '\'')) => value[1..].find(q).map(|end| &value[1..=end]),
            Some(_) => value.split_whitespace().next(),
            None => None,
        };
    }
    None
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn preview(s: &str) -> String {
    match s.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/dir/index.html").unwrap()
    }

    #[test]
    fn extracts_title_text_and_links() {
        let html = r#"<html><head><title>Example &amp; Co</title></head>
            <body><h1>Welcome</h1><p>Hello   <b>world</b></p>
            <a href="/about">About</a> <a href='next.html'>Next</a>
            <a href="mailto:x@example.com">Mail</a>
            <a href="/about">Again</a></body></html>"#;
        let page = summarize_html(&base(), html, true);
        assert_eq!(page.title, "Example & Co");
        assert_eq!(page.text, "Welcome Hello world About Next Mail Again");
        assert_eq!(
            page.links,
            vec![
                "https://example.com/about".to_string(),
                "https://example.com/dir/next.html".to_string(),
            ]
        );
    }

    #[test]
    fn scripts_styles_and_comments_are_hidden() {
        let html = "<style>p{color:red}</style><script>var a = '<b>';</script>\
                    <!-- secret --><p>shown</p>";
        let page = summarize_html(&base(), html, true);
        assert_eq!(page.text, "shown");
    }

    #[test]
    fn noscript_follows_javascript_flag() {
        let html = "<noscript>enable js</noscript><p>app</p>";
        assert_eq!(summarize_html(&base(), html, true).text, "app");
        assert_eq!(summarize_html(&base(), html, false).text, "enable js app");
    }

    #[test]
    fn attr_value_variants() {
        assert_eq!(attr_value(r#"a href="/x" class="y""#, "href"), Some("/x"));
        assert_eq!(attr_value("a HREF='/x'", "href"), Some("/x"));
        assert_eq!(attr_value("a href=/x target=_blank", "href"), Some("/x"));
        assert_eq!(attr_value(r#"a data-href="/no""#, "href"), None);
        assert_eq!(attr_value("a name=top", "href"), None);
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "x".repeat(PREVIEW_CHARS + 10);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn loader_options_from_config() {
        let cfg = SurfaceConfig {
            max_redirects: 1,
            connect_timeout_secs: 3,
            ..SurfaceConfig::default()
        };
        let opts = LoaderOptions::from(&cfg);
        assert_eq!(opts.max_redirects, 1);
        assert_eq!(opts.connect_timeout, Duration::from_secs(3));
        assert_eq!(opts.read_timeout, Duration::from_secs(15));
    }

    #[test]
    fn invalid_url_is_net_error() {
        let err = load_page("http://", &LoaderOptions::default(), None, true).unwrap_err();
        assert!(err.to_string().contains("ERR_INVALID_URL"));
    }
}
