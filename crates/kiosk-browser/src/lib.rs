//! Embedded browser surface for the kiosk.
//!
//! [`HttpSurface`] is the desktop implementation of
//! [`BrowserSurface`]: it fetches pages over HTTP(S), reduces them to a
//! [`Page`] summary, keeps an in-page back stack, and reports everything
//! that happens as [`SurfaceEvent`]s for the controller to consume.
//!
//! Loads are queued by `mount` / `go_back` / `follow_link` and performed
//! by `tick`, so a front end can show the loading state between the two.

pub mod loader;
pub mod nav;

pub use loader::{Connection, LoaderOptions, Page, TlsProvider};
#[cfg(feature = "tls-rustls")]
pub use loader::tls::RustlsTlsProvider;
pub use nav::{HistoryEntry, NavigationController};

use kiosk_types::error::{KioskError, Result};
use kiosk_types::surface::{BrowserSurface, SurfaceCapabilities, SurfaceEvent};

/// Current loading state of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    /// No load in progress.
    Idle,
    /// A load is queued or running.
    Loading,
    /// The most recent load failed.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    /// A new history entry.
    Navigate,
    /// Re-load the current entry (after go-back or reload).
    Revisit,
}

#[derive(Debug, Clone)]
struct PendingLoad {
    url: String,
    kind: LoadKind,
}

/// HTTP-backed browser surface.
pub struct HttpSurface {
    options: LoaderOptions,
    tls: Option<Box<dyn TlsProvider>>,
    caps: SurfaceCapabilities,
    mounted: Option<String>,
    nav: NavigationController,
    pending: Option<PendingLoad>,
    page: Option<Page>,
    state: LoadingState,
    error_message: Option<String>,
    events: Vec<SurfaceEvent>,
}

impl HttpSurface {
    /// A surface without TLS; HTTPS pages fail with an SSL error.
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            tls: None,
            caps: SurfaceCapabilities::default(),
            mounted: None,
            nav: NavigationController::new(),
            pending: None,
            page: None,
            state: LoadingState::Idle,
            error_message: None,
            events: Vec::new(),
        }
    }

    /// Enable HTTPS through `tls`.
    pub fn with_tls(mut self, tls: Box<dyn TlsProvider>) -> Self {
        self.tls = Some(tls);
        self
    }

    /// The most recently loaded page.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// URL of the current history entry.
    pub fn current_url(&self) -> Option<&str> {
        self.nav.current_url()
    }

    pub fn can_go_back(&self) -> bool {
        self.nav.can_go_back()
    }

    /// Navigate to a new URL within the mounted surface.
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        if self.mounted.is_none() {
            return Err(KioskError::Surface("surface is not mounted".into()));
        }
        self.queue(url, LoadKind::Navigate);
        Ok(())
    }

    /// Follow the `index`-th link of the current page.
    pub fn follow_link(&mut self, index: usize) -> Result<()> {
        let target = self
            .page
            .as_ref()
            .and_then(|p| p.links.get(index))
            .cloned()
            .ok_or_else(|| KioskError::Surface(format!("no link #{}", index + 1)))?;
        self.navigate(&target)
    }

    /// Reload the current entry.
    pub fn reload(&mut self) -> Result<()> {
        let url = self
            .nav
            .current_url()
            .or(self.mounted.as_deref())
            .map(str::to_string)
            .ok_or_else(|| KioskError::Surface("surface is not mounted".into()))?;
        self.queue(&url, LoadKind::Revisit);
        Ok(())
    }

    fn queue(&mut self, url: &str, kind: LoadKind) {
        log::debug!("Queue load {url} ({kind:?})");
        self.pending = Some(PendingLoad {
            url: url.to_string(),
            kind,
        });
        self.state = LoadingState::Loading;
        self.events.push(SurfaceEvent::LoadStart);
    }

    fn perform(&mut self, load: PendingLoad) {
        let result = loader::load_page(
            &load.url,
            &self.options,
            self.tls.as_deref(),
            self.caps.javascript,
        );
        match result {
            Ok(page) => {
                log::info!("Loaded {} ({} links)", page.url, page.links.len());
                match load.kind {
                    LoadKind::Navigate => self.nav.navigate(&page.url, &page.title),
                    LoadKind::Revisit => self.nav.update_current(&page.url, &page.title),
                }
                self.page = Some(page);
                self.state = LoadingState::Idle;
                self.error_message = None;
                self.events.push(SurfaceEvent::LoadEnd);
            },
            Err(e) => {
                let message = match e {
                    KioskError::Surface(msg) => msg,
                    other => other.to_string(),
                };
                log::warn!("Load of {} failed: {message}", load.url);
                if load.kind == LoadKind::Navigate {
                    self.nav.navigate(&load.url, "");
                }
                self.page = None;
                self.state = LoadingState::Error;
                self.error_message = Some(message.clone());
                self.events.push(SurfaceEvent::Error(message));
            },
        }
        self.events.push(SurfaceEvent::NavigationStateChanged {
            can_go_back: self.nav.can_go_back(),
        });
    }
}

impl BrowserSurface for HttpSurface {
    fn mount(&mut self, url: &str, caps: SurfaceCapabilities) -> Result<()> {
        log::info!(
            "Mounting surface on {url} (javascript={}, dom_storage={}, inline_media={})",
            caps.javascript,
            caps.dom_storage,
            caps.inline_media,
        );
        self.unmount();
        self.caps = caps;
        self.mounted = Some(url.to_string());
        self.queue(url, LoadKind::Navigate);
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = None;
        self.nav.reset();
        self.pending = None;
        self.page = None;
        self.state = LoadingState::Idle;
        self.error_message = None;
        self.events.clear();
    }

    fn mounted_url(&self) -> Option<&str> {
        self.mounted.as_deref()
    }

    fn go_back(&mut self) -> Result<()> {
        let entry = self
            .nav
            .go_back()
            .ok_or_else(|| KioskError::Surface("no in-page history".into()))?;
        self.queue(&entry.url, LoadKind::Revisit);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn tick(&mut self) {
        if let Some(load) = self.pending.take() {
            self.perform(load);
        }
    }
}
