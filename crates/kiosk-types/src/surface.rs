//! Embedded browser surface contract.
//!
//! The surface renders a URL and reports what happens to it. The controller
//! only consumes [`SurfaceEvent`]s and calls [`BrowserSurface::go_back`];
//! mounting is driven by the shell from the controller's state.

use crate::error::Result;

/// Capability flags passed to the surface when a URL is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    /// Allow script execution.
    pub javascript: bool,
    /// Allow DOM-backed local storage.
    pub dom_storage: bool,
    /// Allow media to play inline rather than fullscreen.
    pub inline_media: bool,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self {
            javascript: true,
            dom_storage: true,
            inline_media: true,
        }
    }
}

/// Signals emitted by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A page load started.
    LoadStart,
    /// A page load finished.
    LoadEnd,
    /// A page load failed with the given description.
    Error(String),
    /// The in-page history position changed.
    NavigationStateChanged { can_go_back: bool },
}

/// An embedded web rendering surface.
pub trait BrowserSurface {
    /// Mount the surface on `url`. Any previous page and history is dropped.
    fn mount(&mut self, url: &str, caps: SurfaceCapabilities) -> Result<()>;

    /// Tear the surface down.
    fn unmount(&mut self);

    /// The URL the surface was mounted with, if mounted.
    fn mounted_url(&self) -> Option<&str>;

    /// Navigate back in the surface's own history.
    fn go_back(&mut self) -> Result<()>;

    /// Drain the events produced since the last call.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;

    /// Perform pending work (e.g. a queued page load).
    fn tick(&mut self) {}
}
