//! Application-wide constants

pub mod paths {
    /// Directory under the platform data dir
    pub const APP_DIR: &str = "sticky-widget";
    /// Fallback when no platform data dir exists
    pub const FALLBACK_DIR: &str = "data";
    pub const TODOS_FILE: &str = "todos.json";
    pub const URLS_FILE: &str = "urls.json";
    pub const SETTINGS_FILE: &str = "settings.json";
}

pub mod env {
    pub const DATA_DIR: &str = "STICKY_WIDGET_DATA_DIR";
    pub const THEME: &str = "STICKY_WIDGET_THEME";
    pub const LOG_LEVEL: &str = "STICKY_WIDGET_LOG_LEVEL";
}

pub mod window {
    pub const TITLE: &str = "Desktop Widget";
    pub const WIDTH: f32 = 400.0;
    pub const COLLAPSED_HEIGHT: f32 = 70.0;
    pub const EXPANDED_HEIGHT: f32 = 500.0;
    /// Gap kept between the widget and the screen's right edge
    pub const EDGE_MARGIN: f32 = 20.0;
    /// Extra bottom gap so the widget sits above the taskbar
    pub const TASKBAR_MARGIN: f32 = 40.0;
    pub const OPACITY: f32 = 0.97;
}

pub mod animation {
    /// Number of interpolation steps for expand/collapse
    pub const STEPS: u32 = 15;
    /// Milliseconds between steps
    pub const STEP_MS: u64 = 10;
}

pub mod reminders {
    /// How far back a reminder may lie and still fire
    pub const GRACE_SECS: i64 = 60;
    /// Window for the "due soon" highlight
    pub const DUE_SOON_HOURS: i64 = 24;
    /// Seconds a toast stays on screen
    pub const TOAST_SECS: u64 = 5;
}

pub mod autostart {
    #[cfg(windows)]
    pub const APP_NAME: &str = "DesktopWidget";
    #[cfg(windows)]
    pub const REGISTRY_RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
    pub const LAUNCH_AGENT_LABEL: &str = "com.user.desktopwidget";
    pub const DESKTOP_FILE: &str = "desktopwidget.desktop";
}

pub mod logging {
    pub const DEFAULT_LEVEL: &str = "info";
    pub const LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
}
