//! HKCU Run-key autostart for Windows

use anyhow::{Result, anyhow};
use std::path::PathBuf;
use tracing::debug;
use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
use windows::Win32::System::Registry::{
    HKEY, HKEY_CURRENT_USER, KEY_WRITE, REG_SAM_FLAGS, REG_SZ, RRF_RT_REG_SZ, RegCloseKey,
    RegDeleteValueW, RegGetValueW, RegOpenKeyExW, RegSetValueExW,
};
use windows::core::{HSTRING, PCWSTR};

use super::Backend;
use crate::constants::autostart::{APP_NAME, REGISTRY_RUN_KEY};

pub struct RunKey {
    exe: PathBuf,
}

impl RunKey {
    pub fn new(exe: PathBuf) -> Self {
        Self { exe }
    }

    fn open(access: REG_SAM_FLAGS) -> Result<HKEY> {
        let subkey = HSTRING::from(REGISTRY_RUN_KEY);
        let mut key = HKEY::default();
        unsafe { RegOpenKeyExW(HKEY_CURRENT_USER, PCWSTR(subkey.as_ptr()), 0, access, &mut key) }
            .ok()
            .map_err(|e| anyhow!("Failed to open registry key {REGISTRY_RUN_KEY}: {e}"))?;
        Ok(key)
    }
}

impl Backend for RunKey {
    fn enable(&self) -> Result<()> {
        let key = Self::open(KEY_WRITE)?;
        let name = HSTRING::from(APP_NAME);
        // REG_SZ data is NUL-terminated UTF-16
        let value = format!("\"{}\"", self.exe.display());
        let data: Vec<u8> = value
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect();

        let result = unsafe { RegSetValueExW(key, PCWSTR(name.as_ptr()), 0, REG_SZ, Some(&data)) };
        let _ = unsafe { RegCloseKey(key) };
        result
            .ok()
            .map_err(|e| anyhow!("Failed to write registry value {APP_NAME}: {e}"))?;
        debug!(value = %value, "Wrote Run key value");
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        let key = Self::open(KEY_WRITE)?;
        let name = HSTRING::from(APP_NAME);
        let result = unsafe { RegDeleteValueW(key, PCWSTR(name.as_ptr())) };
        let _ = unsafe { RegCloseKey(key) };
        if result == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        result
            .ok()
            .map_err(|e| anyhow!("Failed to delete registry value {APP_NAME}: {e}"))
    }

    fn is_enabled(&self) -> bool {
        let subkey = HSTRING::from(REGISTRY_RUN_KEY);
        let name = HSTRING::from(APP_NAME);
        let mut size = 0u32;
        unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                PCWSTR(subkey.as_ptr()),
                PCWSTR(name.as_ptr()),
                RRF_RT_REG_SZ,
                None,
                None,
                Some(&mut size),
            )
        }
        .is_ok()
    }

    fn describe(&self) -> String {
        format!(r"HKCU\{REGISTRY_RUN_KEY}\{APP_NAME}")
    }
}
