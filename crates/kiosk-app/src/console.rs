//! Console line parsing.
//!
//! Plain text is typed into the URL field and submitted. Lines starting
//! with `:` are commands.

use kiosk_core::input::{Button, Control, InputEvent};

pub const HELP: &[&str] = &[
    "<url>        type the URL and open it",
    ":back        hardware back",
    ":change      change URL",
    ":follow N    follow link N on the page",
    ":reload      reload the page",
    ":ok          dismiss the alert",
    ":up :down    move TV focus",
    ":select      press the focused control",
    ":quit        exit",
];

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Events(Vec<InputEvent>),
    Help,
    /// Blank line: just redraw.
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> Parsed {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Parsed::Empty;
    }
    let Some(command) = line.trim().strip_prefix(':') else {
        return Parsed::Events(vec![
            InputEvent::TextEntry(line.to_string()),
            InputEvent::Activate(Control::Submit),
        ]);
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts.next();
    let event = match (name.as_str(), arg) {
        ("back" | "b", None) => InputEvent::ButtonPress(Button::Back),
        ("change" | "c", None) => InputEvent::Activate(Control::ChangeUrl),
        ("reload" | "r", None) => InputEvent::Reload,
        ("ok", None) => InputEvent::Activate(Control::DismissAlert),
        ("up", None) => InputEvent::ButtonPress(Button::Up),
        ("down", None) => InputEvent::ButtonPress(Button::Down),
        ("select", None) => InputEvent::ButtonPress(Button::Confirm),
        ("quit" | "q", None) => InputEvent::Quit,
        ("help" | "h", None) => return Parsed::Help,
        ("follow" | "f", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n >= 1 => InputEvent::FollowLink(n - 1),
            _ => return Parsed::Unknown(format!("not a link number: {n}")),
        },
        _ => return Parsed::Unknown(format!("unknown command: {line}")),
    };
    Parsed::Events(vec![event])
}
