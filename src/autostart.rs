//! Launch-at-login registration
//!
//! Linux: freedesktop entry in ~/.config/autostart
//! macOS: LaunchAgent plist in ~/Library/LaunchAgents, loaded with launchctl
//! Windows: value under HKCU\...\CurrentVersion\Run

#[cfg(windows)]
#[allow(unsafe_code)]
mod registry;

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::constants::autostart::{DESKTOP_FILE, LAUNCH_AGENT_LABEL};

/// One way of making the program start at login
pub trait Backend {
    fn enable(&self) -> Result<()>;
    /// Removing an artifact that does not exist is not an error
    fn disable(&self) -> Result<()>;
    fn is_enabled(&self) -> bool;
    fn describe(&self) -> String;
}

pub struct Autostart {
    backend: Box<dyn Backend>,
}

impl Autostart {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Pick the backend for the running OS, registering the current executable
    pub fn for_current_platform() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to locate current executable")?;
        let exe = exe.canonicalize().unwrap_or(exe);
        Ok(Self::new(platform_backend(exe)?))
    }

    pub fn enable(&self) -> Result<()> {
        info!(artifact = %self.backend.describe(), "Enabling autostart");
        self.backend.enable()
    }

    pub fn disable(&self) -> Result<()> {
        info!(artifact = %self.backend.describe(), "Disabling autostart");
        self.backend.disable()
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_enabled()
    }

    pub fn set(&self, enabled: bool) -> Result<()> {
        if enabled { self.enable() } else { self.disable() }
    }

    /// Bring the host in line with the saved setting, only touching it on mismatch
    pub fn sync(&self, enabled: bool) -> Result<()> {
        if enabled != self.is_enabled() {
            self.set(enabled)?;
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_backend(exe: PathBuf) -> Result<Box<dyn Backend>> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("No config directory"))?
        .join("autostart");
    Ok(Box::new(DesktopEntry::new(dir, exe)))
}

#[cfg(target_os = "macos")]
fn platform_backend(exe: PathBuf) -> Result<Box<dyn Backend>> {
    let dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("No home directory"))?
        .join("Library")
        .join("LaunchAgents");
    Ok(Box::new(LaunchAgent::new(dir, exe, true)))
}

#[cfg(windows)]
fn platform_backend(exe: PathBuf) -> Result<Box<dyn Backend>> {
    Ok(Box::new(registry::RunKey::new(exe)))
}

#[cfg(not(any(unix, windows)))]
fn platform_backend(_exe: PathBuf) -> Result<Box<dyn Backend>> {
    Err(anyhow!("Autostart is not supported on this platform"))
}

/// freedesktop autostart entry
pub struct DesktopEntry {
    path: PathBuf,
    exe: PathBuf,
}

impl DesktopEntry {
    pub fn new(autostart_dir: PathBuf, exe: PathBuf) -> Self {
        Self {
            path: autostart_dir.join(DESKTOP_FILE),
            exe,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn contents(&self) -> String {
        let exe = self.exe.display().to_string();
        let exec = if exe.contains(char::is_whitespace) {
            format!("\"{exe}\"")
        } else {
            exe
        };
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Exec={exec}\n\
             Hidden=false\n\
             NoDisplay=false\n\
             Name=Desktop Widget\n\
             Comment=Desktop Widget with URL launcher and todo list\n\
             X-GNOME-Autostart-enabled=true\n"
        )
    }
}

impl Backend for DesktopEntry {
    fn enable(&self) -> Result<()> {
        write_artifact(&self.path, &self.contents(), 0o755)
    }

    fn disable(&self) -> Result<()> {
        remove_artifact(&self.path)
    }

    fn is_enabled(&self) -> bool {
        self.path.exists()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// macOS per-user LaunchAgent
pub struct LaunchAgent {
    path: PathBuf,
    exe: PathBuf,
    /// Run launchctl load/unload around file changes
    use_launchctl: bool,
}

impl LaunchAgent {
    pub fn new(agents_dir: PathBuf, exe: PathBuf, use_launchctl: bool) -> Self {
        Self {
            path: agents_dir.join(format!("{LAUNCH_AGENT_LABEL}.plist")),
            exe,
            use_launchctl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn contents(&self) -> String {
        let exe = xml_escape(&self.exe.display().to_string());
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>Label</key>
    <string>{LAUNCH_AGENT_LABEL}</string>
    <key>ProgramArguments</key>
    <array>
        <string>{exe}</string>
    </array>
    <key>RunAtLoad</key>
    <true/>
</dict>
</plist>
"#
        )
    }

    fn launchctl(&self, action: &str) {
        if !self.use_launchctl {
            return;
        }
        match Command::new("launchctl").arg(action).arg(&self.path).status() {
            Ok(status) if status.success() => debug!(action, "launchctl succeeded"),
            Ok(status) => warn!(action, %status, "launchctl exited with failure"),
            Err(e) => warn!(action, error = %e, "Failed to run launchctl"),
        }
    }
}

impl Backend for LaunchAgent {
    fn enable(&self) -> Result<()> {
        write_artifact(&self.path, &self.contents(), 0o644)?;
        self.launchctl("load");
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        if self.path.exists() {
            self.launchctl("unload");
        }
        remove_artifact(&self.path)
    }

    fn is_enabled(&self) -> bool {
        self.path.exists()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn write_artifact(path: &Path, contents: &str, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    set_mode(path, mode)?;
    debug!(path = %path.display(), "Wrote autostart artifact");
    Ok(())
}

fn remove_artifact(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed autostart artifact");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exe() -> PathBuf {
        PathBuf::from("/opt/widget/sticky-widget")
    }

    #[test]
    fn test_desktop_entry_enable_then_disable_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let autostart_dir = dir.path().join("autostart");
        let autostart = Autostart::new(Box::new(DesktopEntry::new(autostart_dir.clone(), exe())));

        assert!(!autostart.is_enabled());
        autostart.enable().unwrap();
        assert!(autostart.is_enabled());

        let path = autostart_dir.join(DESKTOP_FILE);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[Desktop Entry]\n"));
        assert!(contents.contains("Exec=/opt/widget/sticky-widget\n"));

        autostart.disable().unwrap();
        assert!(!autostart.is_enabled());
        assert!(!path.exists());
        assert_eq!(fs::read_dir(&autostart_dir).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_desktop_entry_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let entry = DesktopEntry::new(dir.path().to_path_buf(), exe());
        entry.enable().unwrap();
        let mode = fs::metadata(entry.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_desktop_entry_quotes_paths_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let entry = DesktopEntry::new(dir.path().to_path_buf(), PathBuf::from("/home/me/My Apps/widget"));
        assert!(entry.contents().contains("Exec=\"/home/me/My Apps/widget\"\n"));
    }

    #[test]
    fn test_launch_agent_enable_then_disable_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let agent = LaunchAgent::new(dir.path().join("LaunchAgents"), exe(), false);
        let path = agent.path().to_path_buf();
        let autostart = Autostart::new(Box::new(agent));

        autostart.enable().unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<string>com.user.desktopwidget</string>"));
        assert!(contents.contains("<string>/opt/widget/sticky-widget</string>"));
        assert!(contents.contains("<key>RunAtLoad</key>"));

        autostart.disable().unwrap();
        assert!(!path.exists());
        assert!(!autostart.is_enabled());
    }

    #[test]
    fn test_disable_without_artifact_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::new(Box::new(DesktopEntry::new(dir.path().join("missing"), exe())));
        autostart.disable().unwrap();
        assert!(!autostart.is_enabled());
    }

    #[test]
    fn test_sync_follows_setting() {
        let dir = tempfile::tempdir().unwrap();
        let autostart = Autostart::new(Box::new(DesktopEntry::new(dir.path().to_path_buf(), exe())));

        autostart.sync(true).unwrap();
        assert!(autostart.is_enabled());
        autostart.sync(true).unwrap();
        assert!(autostart.is_enabled());
        autostart.sync(false).unwrap();
        assert!(!autostart.is_enabled());
    }

    #[test]
    fn test_plist_escapes_path() {
        let agent = LaunchAgent::new(PathBuf::from("/tmp"), PathBuf::from("/Apps/A&B <x>"), false);
        assert!(agent.contents().contains("<string>/Apps/A&amp;B &lt;x&gt;</string>"));
    }
}
