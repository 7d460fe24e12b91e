//! Kiosk browser console entry point.
//!
//! Enter a URL once; it is saved and opened on every later start until
//! `:change` (or back with no page history) clears it. Type `:help` for
//! the command list.

mod app_state;
mod console;
mod input;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;

use app_state::AppState;
use console::Parsed;
use input::InputResult;
use kiosk_core::config::KioskConfig;
use kiosk_core::platform::{DesktopPlatform, DeviceIdService, resolve_form_factor};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Config path from CLI arg, else KIOSK_CONFIG, else defaults.
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let config = KioskConfig::resolve(explicit.as_deref())?;

    let platform = DesktopPlatform::new();
    let form_factor = resolve_form_factor(config.display.form_factor, &platform);
    log::info!(
        "Starting {} ({form_factor:?}, back policy {:?}, data in {})",
        config.display.window_title,
        config.navigation.back_policy,
        config.storage.data_dir.display(),
    );
    log_device_id(&platform);

    let mut state = AppState::new(config, form_factor);
    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut state, stdin.lock(), &mut stdout.lock())?;

    log::info!("Kiosk shut down cleanly");
    Ok(())
}

/// One-shot diagnostic; nothing consumes the identifier.
fn log_device_id(ids: &dyn DeviceIdService) {
    match ids.device_id() {
        Ok(id) => log::info!("Device ID: {id}"),
        Err(e) => log::info!("Device ID unavailable: {e}"),
    }
}

/// Console event loop: pump the surface, draw, read one line, dispatch.
fn run(state: &mut AppState, mut reader: impl BufRead, out: &mut impl Write) -> Result<()> {
    let mut line = String::new();
    'running: loop {
        if state.load_pending() {
            draw(state, out)?;
        }
        state.pump();
        draw(state, out)?;
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        match console::parse_line(&line) {
            Parsed::Events(events) => {
                for event in events {
                    if input::handle_event(event, state) == InputResult::Quit {
                        break 'running;
                    }
                }
            },
            Parsed::Help => state.notice = Some(console::HELP.join("\n")),
            Parsed::Empty => {},
            Parsed::Unknown(msg) => state.notice = Some(format!("{msg} (:help for commands)")),
        }
    }
    writeln!(out)?;
    Ok(())
}

fn draw(state: &mut AppState, out: &mut impl Write) -> io::Result<()> {
    let view = state.shell.view(&state.controller);
    writeln!(out)?;
    for line in render::render(&view, state.surface.page()) {
        writeln!(out, "{line}")?;
    }
    if let Some(notice) = state.notice.take() {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}
