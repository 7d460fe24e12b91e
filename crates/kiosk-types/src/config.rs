//! Kiosk configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{KioskError, Result};
use crate::surface::SurfaceCapabilities;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "KIOSK_CONFIG";

/// Environment variable overriding `display.form_factor`.
pub const FORM_FACTOR_ENV: &str = "KIOSK_FORM_FACTOR";

/// Storage key the accepted URL is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "cached_url";

/// What a back request does when the surface has no in-page history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackPolicy {
    /// Clear the stored URL and return to the entry form.
    #[default]
    RevertToEntry,
    /// Leave the event unhandled so the platform default runs.
    FallThrough,
}

/// Device class the presentation is specialised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormFactor {
    /// Remote-driven, focus-based navigation.
    Tv,
    /// Phone / tablet with direct touch.
    Handheld,
}

impl FormFactor {
    /// Parse a form factor name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tv" => Some(Self::Tv),
            "handheld" | "phone" | "tablet" => Some(Self::Handheld),
            _ => None,
        }
    }
}

/// Configured form factor, possibly left to detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormFactorPreference {
    #[default]
    Auto,
    Tv,
    Handheld,
}

impl FormFactorPreference {
    /// The forced form factor, or `None` for auto-detection.
    pub fn forced(self) -> Option<FormFactor> {
        match self {
            Self::Auto => None,
            Self::Tv => Some(FormFactor::Tv),
            Self::Handheld => Some(FormFactor::Handheld),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory the store keeps its key file in.
    pub data_dir: PathBuf,
    /// Key (file name) of the persisted URL.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// `[navigation]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub back_policy: BackPolicy,
}

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub form_factor: FormFactorPreference,
    pub window_title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            form_factor: FormFactorPreference::Auto,
            window_title: "Kiosk".to_string(),
        }
    }
}

/// `[surface]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub javascript: bool,
    pub dom_storage: bool,
    pub inline_media: bool,
    pub user_agent: String,
    pub max_redirects: u8,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            javascript: true,
            dom_storage: true,
            inline_media: true,
            user_agent: concat!("Kiosk/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 5,
            connect_timeout_secs: 10,
            read_timeout_secs: 15,
        }
    }
}

impl SurfaceConfig {
    /// Capability flags handed to the surface on mount.
    pub fn capabilities(&self) -> SurfaceCapabilities {
        SurfaceCapabilities {
            javascript: self.javascript,
            dom_storage: self.dom_storage,
            inline_media: self.inline_media,
        }
    }
}

/// Top-level kiosk configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    pub storage: StorageConfig,
    pub navigation: NavigationConfig,
    pub display: DisplayConfig,
    pub surface: SurfaceConfig,
}

impl KioskConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            KioskError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve the effective config: an explicit path (CLI), then the
    /// `KIOSK_CONFIG` env var, then defaults. `KIOSK_FORM_FACTOR` overrides
    /// the display form factor in every case.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut cfg = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(&path)?
            },
            None => Self::default(),
        };
        if let Ok(name) = std::env::var(FORM_FACTOR_ENV) {
            cfg.apply_form_factor_override(&name)?;
        }
        Ok(cfg)
    }

    /// Apply a form factor override by name (`tv`, `handheld`, `auto`).
    pub fn apply_form_factor_override(&mut self, name: &str) -> Result<()> {
        self.display.form_factor = if name.trim().eq_ignore_ascii_case("auto") {
            FormFactorPreference::Auto
        } else {
            match FormFactor::parse(name) {
                Some(FormFactor::Tv) => FormFactorPreference::Tv,
                Some(FormFactor::Handheld) => FormFactorPreference::Handheld,
                None => {
                    return Err(KioskError::Config(format!("unknown form factor: {name}")));
                },
            }
        };
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let key = &self.storage.key;
        if key.is_empty() || key.contains('/') || key.contains('\\') || key == "." || key == ".." {
            return Err(KioskError::Config(format!("invalid storage key: {key:?}")));
        }
        Ok(())
    }
}

/// `$XDG_DATA_HOME/kiosk`, else `$HOME/.local/share/kiosk`, else `./kiosk-data`.
fn default_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("kiosk");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local/share/kiosk");
    }
    PathBuf::from("kiosk-data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let cfg = KioskConfig::default();
        assert_eq!(cfg.storage.key, "cached_url");
        assert_eq!(cfg.navigation.back_policy, BackPolicy::RevertToEntry);
        assert_eq!(cfg.display.form_factor, FormFactorPreference::Auto);
        assert!(cfg.surface.javascript);
        assert!(cfg.surface.dom_storage);
        assert!(cfg.surface.inline_media);
        assert_eq!(cfg.surface.max_redirects, 5);
        assert_eq!(cfg.surface.connect_timeout_secs, 10);
        assert_eq!(cfg.surface.read_timeout_secs, 15);
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = KioskConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, KioskConfig::default());
    }

    #[test]
    fn parses_all_sections() {
        let text = r#"
            [storage]
            data_dir = "/tmp/kiosk"
            key = "home_url"

            [navigation]
            back_policy = "fall-through"

            [display]
            form_factor = "tv"
            window_title = "Lobby"

            [surface]
            javascript = false
            max_redirects = 2
        "#;
        let cfg = KioskConfig::from_toml_str(text).unwrap();
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/tmp/kiosk"));
        assert_eq!(cfg.storage.key, "home_url");
        assert_eq!(cfg.navigation.back_policy, BackPolicy::FallThrough);
        assert_eq!(cfg.display.form_factor, FormFactorPreference::Tv);
        assert_eq!(cfg.display.window_title, "Lobby");
        assert!(!cfg.surface.javascript);
        assert!(cfg.surface.dom_storage);
        assert_eq!(cfg.surface.max_redirects, 2);
    }

    #[test]
    fn unknown_back_policy_rejected() {
        let err = KioskConfig::from_toml_str("[navigation]\nback_policy = \"exit\"").unwrap_err();
        assert!(matches!(err, KioskError::TomlParse(_)));
    }

    #[test]
    fn storage_key_with_separator_rejected() {
        let err = KioskConfig::from_toml_str("[storage]\nkey = \"a/b\"").unwrap_err();
        assert!(format!("{err}").contains("invalid storage key"));
    }

    #[test]
    fn capabilities_follow_surface_flags() {
        let mut cfg = KioskConfig::default();
        cfg.surface.inline_media = false;
        let caps = cfg.surface.capabilities();
        assert!(caps.javascript);
        assert!(!caps.inline_media);
    }

    #[test]
    fn form_factor_override() {
        let mut cfg = KioskConfig::default();
        cfg.apply_form_factor_override("TV").unwrap();
        assert_eq!(cfg.display.form_factor, FormFactorPreference::Tv);
        cfg.apply_form_factor_override("phone").unwrap();
        assert_eq!(cfg.display.form_factor, FormFactorPreference::Handheld);
        cfg.apply_form_factor_override("auto").unwrap();
        assert_eq!(cfg.display.form_factor, FormFactorPreference::Auto);
        assert!(cfg.apply_form_factor_override("watch").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        std::fs::write(&path, "[display]\nform_factor = \"handheld\"\n").unwrap();
        let cfg = KioskConfig::load(&path).unwrap();
        assert_eq!(cfg.display.form_factor.forced(), Some(FormFactor::Handheld));
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KioskConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, KioskError::Config(_)));
    }
}
