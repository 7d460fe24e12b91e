//! Foundation types and traits for the kiosk browser.
//!
//! This crate contains the platform-agnostic types shared by all kiosk
//! crates: error types, input events, the embedded browser surface contract,
//! and configuration.

pub mod config;
pub mod error;
pub mod input;
pub mod surface;
