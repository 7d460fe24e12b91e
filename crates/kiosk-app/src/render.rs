//! Text rendering of the shell's view model.

use kiosk_browser::Page;
use kiosk_core::shell::{BrowsingView, EntryView, Focus, View};

/// Links listed per page.
const MAX_LINKS: usize = 20;

/// Lines for one screen.
pub fn render(view: &View, page: Option<&Page>) -> Vec<String> {
    match view {
        View::Entry(entry) => render_entry(entry),
        View::Browsing(browsing) => render_browsing(browsing, page),
    }
}

fn marker(focus: Option<Focus>, control: Focus) -> &'static str {
    if focus == Some(control) { "> " } else { "  " }
}

fn render_entry(view: &EntryView) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", view.heading)];
    let field = if view.input.is_empty() {
        format!("({})", view.placeholder)
    } else {
        view.input.clone()
    };
    lines.push(format!("{}[ {field} ]", marker(view.focus, Focus::UrlField)));
    lines.push(format!(
        "{}[ {} ]",
        marker(view.focus, Focus::Submit),
        view.submit_label
    ));
    if let Some(alert) = &view.alert {
        lines.push(String::new());
        lines.push(format!("!! {}: {}", alert.title, alert.message));
        lines.push("   (:ok to dismiss)".to_string());
    }
    lines
}

fn render_browsing(view: &BrowsingView, page: Option<&Page>) -> Vec<String> {
    let title = page
        .map(|p| p.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(view.url.as_str());
    let mut lines = vec![format!("== {title} ==")];
    if let Some(error) = &view.error_banner {
        lines.push(format!("!! {error}"));
    }
    if view.loading {
        lines.push(format!("Loading {}...", view.url));
    }
    if let Some(page) = page {
        lines.push(page.url.clone());
        if !page.text.is_empty() {
            lines.push(String::new());
            lines.push(page.text.clone());
        }
        if !page.links.is_empty() {
            lines.push(String::new());
            for (i, link) in page.links.iter().take(MAX_LINKS).enumerate() {
                lines.push(format!("  [{}] {link}", i + 1));
            }
            if page.links.len() > MAX_LINKS {
                lines.push(format!("  ... {} more", page.links.len() - MAX_LINKS));
            }
        }
    }
    lines.push(String::new());
    let back = if view.can_go_back { "  (:back for previous page)" } else { "" };
    lines.push(format!(
        "{}[ {} ]{back}",
        marker(view.focus, Focus::ChangeUrl),
        view.change_url_label
    ));
    lines
}
