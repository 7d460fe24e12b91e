//! Presentation shell.
//!
//! Routes input to the controller, keeps the surface mounted on exactly the
//! controller's active URL, and derives the view model a front end draws.
//! Its only state of its own is the TV focus ring.

use kiosk_types::config::FormFactor;
use kiosk_types::input::{Button, Control, InputEvent};
use kiosk_types::surface::{BrowserSurface, SurfaceCapabilities, SurfaceEvent};

use crate::controller::{Alert, Mode, UrlController};
use crate::store::UrlStore;

pub const ENTRY_HEADING: &str = "Enter Website URL";
pub const ENTRY_PLACEHOLDER: &str = "https://example.com";
pub const SUBMIT_LABEL: &str = "Open Website";
pub const CHANGE_URL_LABEL: &str = "Change URL";

/// Focusable controls of the TV variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    UrlField,
    Submit,
    ChangeUrl,
}

/// What the front end should do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Event consumed; keep running.
    Handled,
    /// Platform default: leave the app.
    Exit,
    /// Surface-specific command (link, reload) for the front end to route
    /// to its concrete surface.
    PassThrough(InputEvent),
}

/// Entry form view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub heading: &'static str,
    pub placeholder: &'static str,
    pub input: String,
    pub submit_label: &'static str,
    pub alert: Option<Alert>,
    /// Focused control (TV only).
    pub focus: Option<Focus>,
}

/// Browsing view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsingView {
    pub url: String,
    pub loading: bool,
    pub error_banner: Option<String>,
    pub can_go_back: bool,
    pub change_url_label: &'static str,
    /// Focused control (TV only).
    pub focus: Option<Focus>,
}

/// The screen to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Entry(EntryView),
    Browsing(BrowsingView),
}

/// Form-factor specific presentation over a [`UrlController`].
#[derive(Debug)]
pub struct Shell {
    form_factor: FormFactor,
    caps: SurfaceCapabilities,
    focus: Focus,
}

impl Shell {
    pub fn new(form_factor: FormFactor, caps: SurfaceCapabilities) -> Self {
        Self {
            form_factor,
            caps,
            focus: Focus::UrlField,
        }
    }

    pub fn form_factor(&self) -> FormFactor {
        self.form_factor
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Route one input event. The surface is re-synced afterwards.
    pub fn dispatch<S: UrlStore>(
        &mut self,
        ctl: &mut UrlController<S>,
        surface: &mut dyn BrowserSurface,
        event: InputEvent,
    ) -> Dispatch {
        let outcome = match event {
            InputEvent::Quit => Dispatch::Exit,
            InputEvent::TextEntry(text) => {
                ctl.edit_text(&text);
                Dispatch::Handled
            },
            InputEvent::Activate(control) => {
                self.activate(ctl, control);
                Dispatch::Handled
            },
            InputEvent::ButtonPress(Button::Back) => {
                if ctl.handle_back(surface) {
                    Dispatch::Handled
                } else {
                    log::info!("Back not handled, leaving");
                    Dispatch::Exit
                }
            },
            InputEvent::ButtonPress(button) => {
                self.press(ctl, button);
                Dispatch::Handled
            },
            InputEvent::FollowLink(_) | InputEvent::Reload => {
                if ctl.mode() == Mode::Browsing {
                    Dispatch::PassThrough(event)
                } else {
                    log::debug!("{event:?} ignored outside browsing mode");
                    Dispatch::Handled
                }
            },
        };
        self.sync_surface(ctl, surface);
        outcome
    }

    /// Let the surface do pending work and feed its events to the
    /// controller.
    pub fn pump_surface<S: UrlStore>(
        &self,
        ctl: &mut UrlController<S>,
        surface: &mut dyn BrowserSurface,
    ) {
        surface.tick();
        for event in surface.poll_events() {
            ctl.on_surface_event(&event);
        }
    }

    /// Mount the surface on the active URL, or unmount it in `Entry`.
    pub fn sync_surface<S: UrlStore>(
        &mut self,
        ctl: &mut UrlController<S>,
        surface: &mut dyn BrowserSurface,
    ) {
        let target = match ctl.mode() {
            Mode::Browsing => ctl.active_url().map(str::to_string),
            Mode::Entry => None,
        };
        match target {
            Some(url) => {
                if surface.mounted_url() != Some(url.as_str())
                    && let Err(e) = surface.mount(&url, self.caps)
                {
                    log::warn!("Could not mount surface on {url}: {e}");
                    ctl.on_surface_event(&SurfaceEvent::Error(e.to_string()));
                }
                self.focus = Focus::ChangeUrl;
            },
            None => {
                if surface.mounted_url().is_some() {
                    surface.unmount();
                }
                if self.focus == Focus::ChangeUrl {
                    self.focus = Focus::UrlField;
                }
            },
        }
    }

    /// Derive the view model.
    pub fn view<S: UrlStore>(&self, ctl: &UrlController<S>) -> View {
        let focus = (self.form_factor == FormFactor::Tv).then_some(self.focus);
        match (ctl.mode(), ctl.active_url()) {
            (Mode::Browsing, Some(url)) => View::Browsing(BrowsingView {
                url: url.to_string(),
                loading: ctl.is_loading(),
                error_banner: ctl.last_error().map(str::to_string),
                can_go_back: ctl.can_navigate_back_in_page(),
                change_url_label: CHANGE_URL_LABEL,
                focus,
            }),
            _ => View::Entry(EntryView {
                heading: ENTRY_HEADING,
                placeholder: ENTRY_PLACEHOLDER,
                input: ctl.pending_input().to_string(),
                submit_label: SUBMIT_LABEL,
                alert: ctl.alert().cloned(),
                focus,
            }),
        }
    }

    fn activate<S: UrlStore>(&mut self, ctl: &mut UrlController<S>, control: Control) {
        match control {
            Control::UrlField => self.focus = Focus::UrlField,
            Control::Submit => {
                ctl.submit();
            },
            Control::ChangeUrl => ctl.change_url(),
            Control::DismissAlert => ctl.dismiss_alert(),
        }
    }

    fn press<S: UrlStore>(&mut self, ctl: &mut UrlController<S>, button: Button) {
        // An open alert takes the confirm press.
        if button == Button::Confirm && ctl.alert().is_some() {
            ctl.dismiss_alert();
            return;
        }
        match (self.form_factor, ctl.mode(), button) {
            (FormFactor::Tv, Mode::Entry, Button::Up | Button::Down) => {
                self.focus = match self.focus {
                    Focus::UrlField => Focus::Submit,
                    _ => Focus::UrlField,
                };
            },
            (FormFactor::Tv, Mode::Entry, Button::Confirm) => {
                if self.focus == Focus::Submit {
                    ctl.submit();
                } else {
                    log::debug!("Confirm on the URL field, waiting for text");
                }
            },
            (FormFactor::Tv, Mode::Browsing, Button::Confirm) => ctl.change_url(),
            (FormFactor::Handheld, Mode::Entry, Button::Confirm) => {
                ctl.submit();
            },
            _ => log::debug!("{button:?} ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockStore, MockSurface, StoreCall};
    use kiosk_types::config::BackPolicy;

    fn setup(
        form_factor: FormFactor,
        store: MockStore,
        policy: BackPolicy,
    ) -> (Shell, UrlController<MockStore>, MockSurface) {
        let mut ctl = UrlController::new(store, policy);
        ctl.startup();
        let mut shell = Shell::new(form_factor, SurfaceCapabilities::default());
        let mut surface = MockSurface::new();
        shell.sync_surface(&mut ctl, &mut surface);
        (shell, ctl, surface)
    }

    #[test]
    fn startup_with_saved_url_mounts_surface() {
        let (_, _, surface) = setup(
            FormFactor::Handheld,
            MockStore::with_value("https://example.com"),
            BackPolicy::default(),
        );
        assert_eq!(surface.mounted.as_deref(), Some("https://example.com"));
        assert_eq!(surface.mount_count, 1);
        assert_eq!(surface.caps, Some(SurfaceCapabilities::default()));
    }

    #[test]
    fn submit_mounts_and_change_url_unmounts() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Handheld, MockStore::new(), BackPolicy::default());
        assert!(surface.mounted.is_none());

        shell.dispatch(&mut ctl, &mut surface, InputEvent::TextEntry("https://a.example".into()));
        shell.dispatch(&mut ctl, &mut surface, InputEvent::Activate(Control::Submit));
        assert_eq!(surface.mounted.as_deref(), Some("https://a.example"));

        shell.dispatch(&mut ctl, &mut surface, InputEvent::Activate(Control::ChangeUrl));
        assert!(surface.mounted.is_none());
        assert_eq!(surface.unmount_count, 1);
        assert!(matches!(shell.view(&ctl), View::Entry(_)));
    }

    #[test]
    fn sync_does_not_remount_same_url() {
        let (mut shell, mut ctl, mut surface) = setup(
            FormFactor::Handheld,
            MockStore::with_value("https://example.com"),
            BackPolicy::default(),
        );
        shell.sync_surface(&mut ctl, &mut surface);
        shell.sync_surface(&mut ctl, &mut surface);
        assert_eq!(surface.mount_count, 1);
    }

    #[test]
    fn pump_feeds_events_to_controller() {
        let (shell, mut ctl, mut surface) = setup(
            FormFactor::Handheld,
            MockStore::with_value("https://example.com"),
            BackPolicy::default(),
        );
        surface.queued.extend([
            SurfaceEvent::Error("net::ERR_NAME_NOT_RESOLVED".into()),
            SurfaceEvent::NavigationStateChanged { can_go_back: false },
        ]);
        shell.pump_surface(&mut ctl, &mut surface);
        assert_eq!(surface.ticks, 1);
        let View::Browsing(view) = shell.view(&ctl) else {
            panic!("expected browsing view");
        };
        assert_eq!(view.error_banner.as_deref(), Some("net::ERR_NAME_NOT_RESOLVED"));
        assert!(!view.loading);
        assert_eq!(view.change_url_label, CHANGE_URL_LABEL);
        assert!(view.focus.is_none());
    }

    #[test]
    fn back_in_entry_exits() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Handheld, MockStore::new(), BackPolicy::default());
        let out = shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Back));
        assert_eq!(out, Dispatch::Exit);
    }

    #[test]
    fn back_policy_controls_exit() {
        let (mut shell, mut ctl, mut surface) = setup(
            FormFactor::Tv,
            MockStore::with_value("https://example.com"),
            BackPolicy::RevertToEntry,
        );
        let out = shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Back));
        assert_eq!(out, Dispatch::Handled);
        assert!(surface.mounted.is_none());
        assert!(ctl.store().calls.contains(&StoreCall::Clear));

        let (mut shell, mut ctl, mut surface) = setup(
            FormFactor::Tv,
            MockStore::with_value("https://example.com"),
            BackPolicy::FallThrough,
        );
        let out = shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Back));
        assert_eq!(out, Dispatch::Exit);
        assert!(surface.mounted.is_some());
    }

    #[test]
    fn tv_focus_ring_cycles_and_confirms() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Tv, MockStore::new(), BackPolicy::default());
        assert_eq!(shell.focus(), Focus::UrlField);
        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Down));
        assert_eq!(shell.focus(), Focus::Submit);
        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Up));
        assert_eq!(shell.focus(), Focus::UrlField);
        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Down));

        shell.dispatch(&mut ctl, &mut surface, InputEvent::TextEntry("https://tv.example".into()));
        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Confirm));
        assert_eq!(ctl.mode(), Mode::Browsing);
        assert_eq!(shell.focus(), Focus::ChangeUrl);
        let View::Browsing(view) = shell.view(&ctl) else {
            panic!("expected browsing view");
        };
        assert_eq!(view.focus, Some(Focus::ChangeUrl));

        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Confirm));
        assert_eq!(ctl.mode(), Mode::Entry);
        assert_eq!(shell.focus(), Focus::UrlField);
    }

    #[test]
    fn confirm_dismisses_alert_first() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Tv, MockStore::new(), BackPolicy::default());
        shell.dispatch(&mut ctl, &mut surface, InputEvent::TextEntry("nope".into()));
        shell.dispatch(&mut ctl, &mut surface, InputEvent::Activate(Control::Submit));
        let View::Entry(view) = shell.view(&ctl) else {
            panic!("expected entry view");
        };
        assert_eq!(view.alert, Some(Alert::invalid_url()));
        assert_eq!(view.input, "nope");

        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Confirm));
        assert!(ctl.alert().is_none());
        assert_eq!(ctl.mode(), Mode::Entry);
    }

    #[test]
    fn handheld_ignores_focus_buttons() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Handheld, MockStore::new(), BackPolicy::default());
        shell.dispatch(&mut ctl, &mut surface, InputEvent::ButtonPress(Button::Down));
        assert_eq!(shell.focus(), Focus::UrlField);
        let View::Entry(view) = shell.view(&ctl) else {
            panic!("expected entry view");
        };
        assert!(view.focus.is_none());
        assert_eq!(view.heading, ENTRY_HEADING);
        assert_eq!(view.placeholder, ENTRY_PLACEHOLDER);
    }

    #[test]
    fn surface_commands_pass_through_only_while_browsing() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Handheld, MockStore::new(), BackPolicy::default());
        assert_eq!(
            shell.dispatch(&mut ctl, &mut surface, InputEvent::Reload),
            Dispatch::Handled
        );
        shell.dispatch(&mut ctl, &mut surface, InputEvent::TextEntry("http://x".into()));
        shell.dispatch(&mut ctl, &mut surface, InputEvent::Activate(Control::Submit));
        assert_eq!(
            shell.dispatch(&mut ctl, &mut surface, InputEvent::FollowLink(2)),
            Dispatch::PassThrough(InputEvent::FollowLink(2))
        );
    }

    #[test]
    fn quit_exits() {
        let (mut shell, mut ctl, mut surface) =
            setup(FormFactor::Handheld, MockStore::new(), BackPolicy::default());
        assert_eq!(shell.dispatch(&mut ctl, &mut surface, InputEvent::Quit), Dispatch::Exit);
    }
}
