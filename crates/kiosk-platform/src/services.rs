//! Platform service traits and desktop implementation.

use std::path::PathBuf;

use kiosk_types::config::{FormFactor, FormFactorPreference};
use kiosk_types::error::{KioskError, Result};

/// Environment variable the desktop platform reads its device class from.
pub const DEVICE_CLASS_ENV: &str = "KIOSK_DEVICE_CLASS";

/// Where a Linux desktop keeps its machine identifier.
pub const DESKTOP_MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

// ---------------------------------------------------------------------------
// Display service
// ---------------------------------------------------------------------------

/// Abstraction over the platform's device-class capability flags.
pub trait DisplayService {
    /// Detect which form factor this device is.
    fn detect_form_factor(&self) -> Result<FormFactor>;
}

// ---------------------------------------------------------------------------
// Device identity service
// ---------------------------------------------------------------------------

/// Abstraction over a stable per-device identifier.
pub trait DeviceIdService {
    /// The device identifier, trimmed.
    fn device_id(&self) -> Result<String>;
}

/// Pick the form factor once at startup.
///
/// A forced preference always wins; `Auto` asks the platform and falls back
/// to handheld when detection fails.
pub fn resolve_form_factor(pref: FormFactorPreference, platform: &dyn DisplayService) -> FormFactor {
    let detected = platform.detect_form_factor();
    match (pref.forced(), detected) {
        (Some(forced), Ok(found)) => {
            if forced == FormFactor::Tv && found != FormFactor::Tv {
                log::warn!("TV layout forced on a device that does not report itself as a TV");
            }
            forced
        },
        (Some(forced), Err(_)) => forced,
        (None, Ok(found)) => found,
        (None, Err(e)) => {
            log::warn!("Form factor detection failed ({e}); using handheld layout");
            FormFactor::Handheld
        },
    }
}

// ---------------------------------------------------------------------------
// Desktop implementation
// ---------------------------------------------------------------------------

/// Default platform implementation for desktop / set-top Linux.
pub struct DesktopPlatform {
    device_class: Option<String>,
    machine_id_paths: Vec<PathBuf>,
}

impl DesktopPlatform {
    /// Read the device class from `KIOSK_DEVICE_CLASS` and the machine id
    /// from the standard locations.
    pub fn new() -> Self {
        Self {
            device_class: std::env::var(DEVICE_CLASS_ENV).ok(),
            machine_id_paths: DESKTOP_MACHINE_ID_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Build a platform with explicit inputs.
    pub fn with_sources(device_class: Option<&str>, machine_id_paths: Vec<PathBuf>) -> Self {
        Self {
            device_class: device_class.map(str::to_string),
            machine_id_paths,
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayService for DesktopPlatform {
    fn detect_form_factor(&self) -> Result<FormFactor> {
        match self.device_class.as_deref() {
            None => Ok(FormFactor::Handheld),
            Some(class) => match class.trim().to_ascii_lowercase().as_str() {
                "tv" | "television" | "leanback" => Ok(FormFactor::Tv),
                other => FormFactor::parse(other).ok_or_else(|| {
                    KioskError::Platform(format!("unknown device class: {class}"))
                }),
            },
        }
    }
}

impl DeviceIdService for DesktopPlatform {
    fn device_id(&self) -> Result<String> {
        for path in &self.machine_id_paths {
            if let Ok(text) = std::fs::read_to_string(path) {
                let id = text.trim();
                if !id.is_empty() {
                    return Ok(id.to_string());
                }
            }
        }
        Err(KioskError::Platform("no machine id available".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingDisplay;

    impl DisplayService for FailingDisplay {
        fn detect_form_factor(&self) -> Result<FormFactor> {
            Err(KioskError::Platform("no display".into()))
        }
    }

    #[test]
    fn desktop_without_class_is_handheld() {
        let platform = DesktopPlatform::with_sources(None, Vec::new());
        assert_eq!(platform.detect_form_factor().unwrap(), FormFactor::Handheld);
    }

    #[test]
    fn desktop_tv_classes() {
        for class in ["tv", "TV", " television ", "leanback"] {
            let platform = DesktopPlatform::with_sources(Some(class), Vec::new());
            assert_eq!(platform.detect_form_factor().unwrap(), FormFactor::Tv, "{class}");
        }
        let platform = DesktopPlatform::with_sources(Some("tablet"), Vec::new());
        assert_eq!(platform.detect_form_factor().unwrap(), FormFactor::Handheld);
    }

    #[test]
    fn desktop_unknown_class_errors() {
        let platform = DesktopPlatform::with_sources(Some("fridge"), Vec::new());
        assert!(platform.detect_form_factor().is_err());
    }

    #[test]
    fn forced_preference_wins() {
        let platform = DesktopPlatform::with_sources(Some("tv"), Vec::new());
        assert_eq!(
            resolve_form_factor(FormFactorPreference::Handheld, &platform),
            FormFactor::Handheld
        );
        let platform = DesktopPlatform::with_sources(None, Vec::new());
        assert_eq!(
            resolve_form_factor(FormFactorPreference::Tv, &platform),
            FormFactor::Tv
        );
    }

    #[test]
    fn auto_uses_detection() {
        let platform = DesktopPlatform::with_sources(Some("tv"), Vec::new());
        assert_eq!(
            resolve_form_factor(FormFactorPreference::Auto, &platform),
            FormFactor::Tv
        );
    }

    #[test]
    fn auto_falls_back_to_handheld() {
        assert_eq!(
            resolve_form_factor(FormFactorPreference::Auto, &FailingDisplay),
            FormFactor::Handheld
        );
    }

    #[test]
    fn device_id_reads_first_available_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let empty = dir.path().join("empty");
        let real = dir.path().join("machine-id");
        std::fs::write(&empty, "  \n").unwrap();
        std::fs::write(&real, "0123abcd\n").unwrap();
        let platform = DesktopPlatform::with_sources(None, vec![missing, empty, real]);
        assert_eq!(platform.device_id().unwrap(), "0123abcd");
    }

    #[test]
    fn device_id_unavailable() {
        let platform = DesktopPlatform::with_sources(None, Vec::new());
        assert!(matches!(platform.device_id(), Err(KioskError::Platform(_))));
    }
}
