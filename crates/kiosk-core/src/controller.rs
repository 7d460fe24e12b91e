//! URL-state controller.
//!
//! Owns the switch between the entry form and the browsing view, the
//! persisted URL, and the loading / error / back-navigation indicators fed
//! by the embedded surface. Every transition, including its store call,
//! completes before the method returns.

use kiosk_types::config::BackPolicy;
use kiosk_types::surface::{BrowserSurface, SurfaceEvent};

use crate::formatter::format_url;
use crate::store::UrlStore;

/// Top-level screen mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// URL entry form.
    Entry,
    /// Embedded surface showing `active_url`.
    Browsing,
}

/// A modal notice shown over the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// Submitting again may succeed.
    pub retryable: bool,
}

impl Alert {
    /// Submitted text did not start with an HTTP(S) scheme.
    pub fn invalid_url() -> Self {
        Self {
            title: "Invalid URL".to_string(),
            message: "URL must start with http:// or https://".to_string(),
            retryable: false,
        }
    }

    /// The accepted URL could not be persisted.
    pub fn save_failed(detail: &str) -> Self {
        Self {
            title: "Could not save URL".to_string(),
            message: format!("{detail}. Submit again to retry."),
            retryable: true,
        }
    }
}

/// The URL-state machine.
#[derive(Debug)]
pub struct UrlController<S: UrlStore> {
    store: S,
    back_policy: BackPolicy,
    mode: Mode,
    pending_input: String,
    active_url: Option<String>,
    is_loading: bool,
    last_error: Option<String>,
    can_navigate_back_in_page: bool,
    alert: Option<Alert>,
}

impl<S: UrlStore> UrlController<S> {
    /// A controller in `Entry` mode. Call [`startup`](Self::startup) next.
    pub fn new(store: S, back_policy: BackPolicy) -> Self {
        Self {
            store,
            back_policy,
            mode: Mode::Entry,
            pending_input: String::new(),
            active_url: None,
            is_loading: false,
            last_error: None,
            can_navigate_back_in_page: false,
            alert: None,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Restore the persisted URL, entering `Browsing` if one is saved.
    ///
    /// A failed or unusable load leaves the controller in `Entry`.
    pub fn startup(&mut self) {
        let saved = match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("Could not load saved URL, starting at entry form: {e}");
                return;
            },
        };
        let Some(saved) = saved else {
            log::info!("No saved URL, starting at entry form");
            return;
        };
        match format_url(&saved) {
            Ok(url) => {
                log::info!("Restored saved URL {url}");
                self.enter_browsing(url);
            },
            Err(e) => log::warn!("Ignoring saved value: {e}"),
        }
    }

    /// Replace the entry text. Any alert is dismissed.
    pub fn edit_text(&mut self, text: &str) {
        if self.mode != Mode::Entry {
            log::debug!("Text edit ignored outside entry mode");
            return;
        }
        self.pending_input = text.to_string();
        self.alert = None;
    }

    /// Validate and persist the entry text.
    ///
    /// Returns `true` when the controller entered `Browsing`.
    pub fn submit(&mut self) -> bool {
        if self.mode != Mode::Entry {
            log::debug!("Submit ignored outside entry mode");
            return false;
        }
        let accepted = match format_url(&self.pending_input) {
            Ok(url) => url,
            Err(e) => {
                log::info!("Rejected submission: {e}");
                self.alert = Some(Alert::invalid_url());
                return false;
            },
        };
        if let Err(e) = self.store.save(&accepted) {
            log::warn!("Could not save {accepted}: {e}");
            self.alert = Some(Alert::save_failed(&e.to_string()));
            return false;
        }
        log::info!("Saved URL {accepted}");
        self.enter_browsing(accepted);
        true
    }

    /// Apply a signal from the embedded surface.
    pub fn on_surface_event(&mut self, event: &SurfaceEvent) {
        if self.mode != Mode::Browsing {
            log::debug!("Surface event {event:?} ignored outside browsing mode");
            return;
        }
        match event {
            SurfaceEvent::LoadStart => {
                self.is_loading = true;
                self.last_error = None;
            },
            SurfaceEvent::LoadEnd => self.is_loading = false,
            SurfaceEvent::Error(message) => {
                log::warn!("Surface error: {message}");
                self.last_error = Some(message.clone());
                self.is_loading = false;
            },
            SurfaceEvent::NavigationStateChanged { can_go_back } => {
                self.can_navigate_back_in_page = *can_go_back;
            },
        }
    }

    /// Forget the saved URL and return to the entry form.
    ///
    /// A failed clear is logged and the transition proceeds; the old value
    /// may then reappear on the next launch. No-op in `Entry`.
    pub fn change_url(&mut self) {
        if self.mode != Mode::Browsing {
            log::debug!("Change URL ignored outside browsing mode");
            return;
        }
        if let Err(e) = self.store.clear() {
            log::warn!("Could not clear saved URL, it may reappear on restart: {e}");
        }
        log::info!("Returning to entry form");
        self.enter_entry();
    }

    /// Handle a hardware / system back request.
    ///
    /// Returns `true` if the request was consumed and the platform default
    /// (usually exit) must not run.
    pub fn handle_back(&mut self, surface: &mut dyn BrowserSurface) -> bool {
        if self.mode != Mode::Browsing {
            return false;
        }
        if self.can_navigate_back_in_page {
            match surface.go_back() {
                Ok(()) => return true,
                Err(e) => {
                    log::warn!("In-page back failed, applying back policy: {e}");
                    self.can_navigate_back_in_page = false;
                },
            }
        }
        match self.back_policy {
            BackPolicy::RevertToEntry => {
                self.change_url();
                true
            },
            BackPolicy::FallThrough => false,
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    fn enter_browsing(&mut self, url: String) {
        self.mode = Mode::Browsing;
        self.active_url = Some(url);
        self.pending_input.clear();
        self.is_loading = true;
        self.last_error = None;
        self.can_navigate_back_in_page = false;
        self.alert = None;
    }

    fn enter_entry(&mut self) {
        self.mode = Mode::Entry;
        self.active_url = None;
        self.pending_input.clear();
        self.is_loading = false;
        self.last_error = None;
        self.can_navigate_back_in_page = false;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn active_url(&self) -> Option<&str> {
        self.active_url.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_navigate_back_in_page(&self) -> bool {
        self.can_navigate_back_in_page
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn back_policy(&self) -> BackPolicy {
        self.back_policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
