use kiosk_browser::{HttpSurface, LoaderOptions, LoadingState, RustlsTlsProvider};
use kiosk_core::config::{FormFactor, KioskConfig};
use kiosk_core::controller::UrlController;
use kiosk_core::shell::Shell;
use kiosk_core::store::VfsUrlStore;
use kiosk_core::vfs::DiskVfs;

/// The controller as the app runs it: persisted on disk.
pub type DiskController = UrlController<VfsUrlStore<DiskVfs>>;

/// All mutable application state.
pub struct AppState {
    pub shell: Shell,
    pub controller: DiskController,
    pub surface: HttpSurface,
    /// One-shot console message shown on the next draw.
    pub notice: Option<String>,
}

impl AppState {
    /// Build the app over the configured data directory, with HTTPS.
    pub fn new(config: KioskConfig, form_factor: FormFactor) -> Self {
        let surface = HttpSurface::new(LoaderOptions::from(&config.surface))
            .with_tls(Box::new(RustlsTlsProvider::new()));
        Self::with_surface(config, form_factor, surface)
    }

    /// Build the app around an existing surface.
    pub fn with_surface(
        config: KioskConfig,
        form_factor: FormFactor,
        surface: HttpSurface,
    ) -> Self {
        // Startup never fails on storage; saves report the error instead.
        let vfs = DiskVfs::open(&config.storage.data_dir).unwrap_or_else(|e| {
            log::warn!("Storage unavailable, the URL will not persist: {e}");
            DiskVfs::new(&config.storage.data_dir)
        });
        let store = VfsUrlStore::with_key(vfs, "/", &config.storage.key);
        let mut controller = UrlController::new(store, config.navigation.back_policy);
        controller.startup();

        let shell = Shell::new(form_factor, config.surface.capabilities());
        let mut state = Self {
            shell,
            controller,
            surface,
            notice: None,
        };
        state
            .shell
            .sync_surface(&mut state.controller, &mut state.surface);
        state
    }

    /// Whether the surface has a load waiting to run.
    pub fn load_pending(&self) -> bool {
        self.surface.state() == LoadingState::Loading
    }

    /// Run pending surface work and apply its events.
    pub fn pump(&mut self) {
        self.shell
            .pump_surface(&mut self.controller, &mut self.surface);
    }
}
