//! Persisted URL store.
//!
//! A single string under a fixed key. On a [`Vfs`] the key is a file in the
//! store directory holding the raw URL bytes.

use kiosk_types::config::DEFAULT_STORAGE_KEY;
use kiosk_types::error::{KioskError, Result};
use kiosk_vfs::Vfs;

/// Durable storage for the last accepted URL.
pub trait UrlStore {
    /// The saved URL, or `None` if never saved or cleared.
    fn load(&mut self) -> Result<Option<String>>;

    /// Replace any saved URL with `value`.
    fn save(&mut self, value: &str) -> Result<()>;

    /// Remove the saved URL. Clearing an empty store succeeds.
    fn clear(&mut self) -> Result<()>;
}

/// [`UrlStore`] backed by a file on a [`Vfs`].
#[derive(Debug)]
pub struct VfsUrlStore<V: Vfs> {
    vfs: V,
    dir: String,
    key: String,
}

impl<V: Vfs> VfsUrlStore<V> {
    /// Store under `/` with the default key.
    pub fn new(vfs: V) -> Self {
        Self::with_key(vfs, "/", DEFAULT_STORAGE_KEY)
    }

    /// Store as `<dir>/<key>`.
    pub fn with_key(vfs: V, dir: &str, key: &str) -> Self {
        let dir = format!("/{}", dir.trim_matches('/'));
        Self {
            vfs,
            dir,
            key: key.to_string(),
        }
    }

    /// Virtual path of the value file.
    pub fn path(&self) -> String {
        if self.dir == "/" {
            format!("/{}", self.key)
        } else {
            format!("{}/{}", self.dir, self.key)
        }
    }

    pub fn vfs(&self) -> &V {
        &self.vfs
    }

    pub fn into_inner(self) -> V {
        self.vfs
    }
}

impl<V: Vfs> UrlStore for VfsUrlStore<V> {
    fn load(&mut self) -> Result<Option<String>> {
        let path = self.path();
        if !self.vfs.exists(&path) {
            return Ok(None);
        }
        let bytes = self
            .vfs
            .read(&path)
            .map_err(|e| KioskError::Storage(format!("load {}: {e}", self.key)))?;
        let value = String::from_utf8(bytes)
            .map_err(|_| KioskError::Storage(format!("{} is not valid UTF-8", self.key)))?;
        Ok((!value.is_empty()).then_some(value))
    }

    fn save(&mut self, value: &str) -> Result<()> {
        let path = self.path();
        if self.dir != "/" && !self.vfs.exists(&self.dir) {
            self.vfs
                .mkdir(&self.dir)
                .map_err(|e| KioskError::Storage(format!("save {}: {e}", self.key)))?;
        }
        self.vfs
            .write(&path, value.as_bytes())
            .map_err(|e| KioskError::Storage(format!("save {}: {e}", self.key)))?;
        log::debug!("Saved {} ({} bytes)", self.key, value.len());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let path = self.path();
        if !self.vfs.exists(&path) {
            return Ok(());
        }
        self.vfs
            .remove(&path)
            .map_err(|e| KioskError::Storage(format!("clear {}: {e}", self.key)))?;
        log::debug!("Cleared {}", self.key);
        Ok(())
    }
}
