//! Kiosk browser core.
//!
//! Platform-agnostic URL formatter, persisted URL store, URL-state
//! controller and presentation shell. Front ends drive a [`shell::Shell`]
//! with input events and draw the [`shell::View`] it derives.

// Re-exports from kiosk-types (foundation types and traits).
pub use kiosk_types::config;
pub use kiosk_types::error;
pub use kiosk_types::input;
pub use kiosk_types::surface;

pub use kiosk_browser as browser;
pub use kiosk_platform as platform;
pub use kiosk_vfs as vfs;

pub mod controller;
pub mod formatter;
pub mod shell;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;
