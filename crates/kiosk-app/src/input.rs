use kiosk_core::input::InputEvent;
use kiosk_core::shell::Dispatch;

use crate::app_state::AppState;

/// Result of handling a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Route one event through the shell; surface commands go to the page.
pub fn handle_event(event: InputEvent, state: &mut AppState) -> InputResult {
    match state
        .shell
        .dispatch(&mut state.controller, &mut state.surface, event)
    {
        Dispatch::Handled => InputResult::Continue,
        Dispatch::Exit => InputResult::Quit,
        Dispatch::PassThrough(event) => {
            handle_surface_command(event, state);
            InputResult::Continue
        },
    }
}

fn handle_surface_command(event: InputEvent, state: &mut AppState) {
    let result = match event {
        InputEvent::FollowLink(index) => state.surface.follow_link(index),
        InputEvent::Reload => state.surface.reload(),
        other => {
            log::debug!("Unexpected pass-through event {other:?}");
            Ok(())
        },
    };
    if let Err(e) = result {
        state.notice = Some(e.to_string());
    }
}
