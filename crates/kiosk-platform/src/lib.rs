//! Platform service abstractions for the kiosk browser.

mod services;

pub use services::{
    DESKTOP_MACHINE_ID_PATHS, DEVICE_CLASS_ENV, DesktopPlatform, DeviceIdService, DisplayService,
    resolve_form_factor,
};
