//! Shared test doubles for the controller and shell.
//!
//! [`MockStore`] records every store call and can be told to fail;
//! [`MockSurface`] records mounts and back requests and replays queued
//! events.

use kiosk_types::error::{KioskError, Result};
use kiosk_types::surface::{BrowserSurface, SurfaceCapabilities, SurfaceEvent};

use crate::store::UrlStore;

/// A recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Load,
    Save(String),
    Clear,
}

/// In-memory [`UrlStore`] with failure injection.
#[derive(Debug, Default)]
pub struct MockStore {
    pub value: Option<String>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub fail_clear: bool,
    pub calls: Vec<StoreCall>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `url`.
    pub fn with_value(url: &str) -> Self {
        Self {
            value: Some(url.to_string()),
            ..Self::default()
        }
    }
}

impl UrlStore for MockStore {
    fn load(&mut self) -> Result<Option<String>> {
        self.calls.push(StoreCall::Load);
        if self.fail_load {
            return Err(KioskError::Storage("load failed".into()));
        }
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<()> {
        self.calls.push(StoreCall::Save(value.to_string()));
        if self.fail_save {
            return Err(KioskError::Storage("disk full".into()));
        }
        self.value = Some(value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.calls.push(StoreCall::Clear);
        if self.fail_clear {
            return Err(KioskError::Storage("clear failed".into()));
        }
        self.value = None;
        Ok(())
    }
}

/// [`BrowserSurface`] that only records what was asked of it.
#[derive(Debug, Default)]
pub struct MockSurface {
    pub mounted: Option<String>,
    pub caps: Option<SurfaceCapabilities>,
    pub mount_count: usize,
    pub unmount_count: usize,
    pub go_back_count: usize,
    pub fail_go_back: bool,
    pub queued: Vec<SurfaceEvent>,
    pub ticks: usize,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BrowserSurface for MockSurface {
    fn mount(&mut self, url: &str, caps: SurfaceCapabilities) -> Result<()> {
        self.mounted = Some(url.to_string());
        self.caps = Some(caps);
        self.mount_count += 1;
        self.queued.push(SurfaceEvent::LoadStart);
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = None;
        self.unmount_count += 1;
        self.queued.clear();
    }

    fn mounted_url(&self) -> Option<&str> {
        self.mounted.as_deref()
    }

    fn go_back(&mut self) -> Result<()> {
        self.go_back_count += 1;
        if self.fail_go_back {
            return Err(KioskError::Surface("no in-page history".into()));
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.queued)
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }
}
