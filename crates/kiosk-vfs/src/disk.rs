//! On-disk VFS rooted at a host directory.
//!
//! Virtual path `/a/b` maps to `<root>/a/b`. Writes go through a temporary
//! sibling file and a rename so a crash never leaves a half-written value.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use kiosk_types::error::{KioskError, Result};

use crate::Vfs;
use crate::memory::normalize;

/// A VFS backed by the host file system.
#[derive(Debug, Clone)]
pub struct DiskVfs {
    root: PathBuf,
}

impl DiskVfs {
    /// A VFS rooted at `root`. The directory is created on the first
    /// write or mkdir; until then reads see an empty tree.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a VFS rooted at `root`, creating the directory now.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let vfs = Self::new(root);
        vfs.ensure_root()?;
        log::debug!("DiskVfs rooted at {}", vfs.root.display());
        Ok(vfs)
    }

    fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            KioskError::Vfs(format!("cannot create root {}: {e}", self.root.display()))
        })
    }

    /// The host directory backing this VFS.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn host_path(&self, path: &str) -> Result<PathBuf> {
        let path = normalize(path);
        let mut host = self.root.clone();
        for part in path.split('/').filter(|p| !p.is_empty()) {
            if part == "." || part == ".." {
                return Err(KioskError::Vfs(format!("path escapes root: {path}")));
            }
            host.push(part);
        }
        Ok(host)
    }
}

impl Vfs for DiskVfs {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let host = self.host_path(path)?;
        fs::read(&host).map_err(|e| KioskError::Vfs(format!("read {path}: {e}")))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let host = self.host_path(path)?;
        self.ensure_root()?;
        let parent = host
            .parent()
            .ok_or_else(|| KioskError::Vfs(format!("cannot write root: {path}")))?;
        if !parent.is_dir() {
            return Err(KioskError::Vfs(format!(
                "parent directory does not exist: {path}"
            )));
        }
        let file_name = host
            .file_name()
            .ok_or_else(|| KioskError::Vfs(format!("cannot write root: {path}")))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp = parent.join(tmp_name);

        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        });
        written
            .and_then(|()| fs::rename(&tmp, &host))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                KioskError::Vfs(format!("write {path}: {e}"))
            })
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let host = self.host_path(path)?;
        self.ensure_root()?;
        fs::create_dir_all(&host).map_err(|e| KioskError::Vfs(format!("mkdir {path}: {e}")))
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        let host = self.host_path(path)?;
        if host == self.root {
            return Err(KioskError::Vfs("cannot remove root".to_string()));
        }
        let result = if host.is_dir() {
            fs::remove_dir(&host)
        } else {
            fs::remove_file(&host)
        };
        result.map_err(|e| KioskError::Vfs(format!("remove {path}: {e}")))
    }

    fn exists(&self, path: &str) -> bool {
        self.host_path(path).is_ok_and(|p| p.exists())
    }
}
