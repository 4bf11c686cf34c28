//! Stores and settings loaded once at startup and shared by the GUI and CLI

use anyhow::Result;
use tracing::{info, warn};

use crate::autostart::Autostart;
use crate::config::Settings;
use crate::persistence::DataDir;
use crate::todo::TodoStore;
use crate::urls::UrlStore;

pub struct AppData {
    pub data_dir: DataDir,
    pub settings: Settings,
    pub todos: TodoStore,
    pub urls: UrlStore,
    /// `None` when the platform has no autostart backend
    pub autostart: Option<Autostart>,
}

impl AppData {
    /// Load both stores and bring the autostart artifact in line with `settings`
    pub fn open(data_dir: DataDir, settings: Settings, autostart: Option<Autostart>) -> Result<Self> {
        data_dir.ensure()?;

        let todos = TodoStore::load(data_dir.todos());
        let urls = UrlStore::load(data_dir.urls());

        if let Some(autostart) = &autostart {
            let _ = autostart
                .sync(settings.autostart)
                .inspect_err(|e| warn!(error = %e, "Failed to sync autostart with settings"));
        }

        info!(
            data_dir = %data_dir.root().display(),
            todos = todos.todos().len(),
            url_groups = urls.groups().len(),
            "Application data ready"
        );
        Ok(Self {
            data_dir,
            settings,
            todos,
            urls,
            autostart,
        })
    }

    /// Platform autostart, or `None` with a warning when unavailable
    pub fn platform_autostart() -> Option<Autostart> {
        Autostart::for_current_platform()
            .inspect_err(|e| warn!(error = %e, "Autostart unavailable"))
            .ok()
    }

    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.data_dir.settings())
    }
}
