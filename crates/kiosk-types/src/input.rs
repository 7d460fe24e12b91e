//! Platform-agnostic input event types.
//!
//! Every front end maps its native input to these enums. The controller and
//! shell never see raw platform input.

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A remote / d-pad / hardware button pressed.
    ButtonPress(Button),
    /// Replace the contents of the URL entry field.
    TextEntry(String),
    /// An on-screen control was tapped or clicked directly.
    Activate(Control),
    /// Follow the n-th link (zero-based) on the current page.
    FollowLink(usize),
    /// Reload the current page.
    Reload,
    /// User requested quit (window close, EOF, etc.).
    Quit,
}

/// Buttons that map across all form factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Confirm,
    /// Hardware / system back.
    Back,
}

/// On-screen controls the shell exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// The URL text field.
    UrlField,
    /// "Open Website".
    Submit,
    /// "Change URL".
    ChangeUrl,
    /// The "OK" button of an alert.
    DismissAlert,
}
