//! NVS-backed settings store.
//!
//! Implements [`SettingsPort`] for the RingRing opener.  Settings are
//! serialized with postcard into a single NVS blob.
//!
//! # Security
//!
//! - Validation before persistence: `save()` refuses settings that fail
//!   [`Settings::validate`], so flash never holds a config that could
//!   wedge the press classifier.
//! - Namespace isolation: everything lives under the `ringring` namespace.
//! - Atomic writes: ESP-IDF NVS commits are atomic per nvs_commit().

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

use crate::app::ports::{SettingsError, SettingsPort};
use crate::config::Settings;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const SETTINGS_NAMESPACE: &str = "ringring";
#[cfg(target_os = "espidf")]
const SETTINGS_KEY: &[u8] = b"settings\0";
#[cfg(target_os = "espidf")]
const MAX_BLOB_SIZE: usize = 1024;

pub struct SettingsStore {
    #[cfg(not(target_os = "espidf"))]
    blob: std::cell::RefCell<Option<Vec<u8>>>,
}

impl SettingsStore {
    /// Create the store and initialise NVS flash.
    ///
    /// Returns `Err(SettingsError::IoError)` if flash initialisation fails
    /// unrecoverably. On first boot or after a version mismatch the NVS
    /// partition is erased and re-initialised automatically.
    pub fn new() -> Result<Self, SettingsError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase are called from the
            // single main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                let ret2 = unsafe { nvs_flash_erase() };
                if ret2 != ESP_OK {
                    return Err(SettingsError::IoError);
                }
                let ret3 = unsafe { nvs_flash_init() };
                if ret3 != ESP_OK {
                    return Err(SettingsError::IoError);
                }
            } else if ret != ESP_OK {
                return Err(SettingsError::IoError);
            }
            info!("SettingsStore: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("SettingsStore: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            blob: std::cell::RefCell::new(None),
        })
    }

    /// Open an NVS namespace, execute a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, i32>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, i32>,
    {
        let mut ns_buf = [0u8; 16];
        let ns_bytes = namespace.as_bytes();
        let len = ns_bytes.len().min(15);
        ns_buf[..len].copy_from_slice(&ns_bytes[..len]);

        let mut handle: nvs_handle_t = 0;
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let ret = unsafe { nvs_open(ns_buf.as_ptr() as *const _, mode, &mut handle) };
        if ret != ESP_OK {
            return Err(ret);
        }

        let result = f(handle);
        unsafe {
            nvs_close(handle);
        }
        result
    }

    /// Plant raw bytes in the simulated store (for corruption tests).
    #[cfg(not(target_os = "espidf"))]
    pub fn inject_raw(&self, bytes: &[u8]) {
        *self.blob.borrow_mut() = Some(bytes.to_vec());
    }
}

impl SettingsPort for SettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        #[cfg(not(target_os = "espidf"))]
        {
            match self.blob.borrow().as_deref() {
                Some(bytes) => {
                    let settings: Settings =
                        postcard::from_bytes(bytes).map_err(|_| SettingsError::Corrupted)?;
                    info!("SettingsStore: loaded settings from store");
                    Ok(settings)
                }
                None => Err(SettingsError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(SETTINGS_NAMESPACE, false, |handle| {
                let mut size: usize = 0;

                // First call: get size
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        SETTINGS_KEY.as_ptr() as *const _,
                        core::ptr::null_mut(),
                        &mut size,
                    )
                };
                if ret == ESP_ERR_NVS_NOT_FOUND {
                    return Err(ESP_ERR_NVS_NOT_FOUND);
                }
                if ret != ESP_OK || size == 0 || size > MAX_BLOB_SIZE {
                    return Err(ret);
                }

                let mut buf = vec![0u8; size];
                let ret = unsafe {
                    nvs_get_blob(
                        handle,
                        SETTINGS_KEY.as_ptr() as *const _,
                        buf.as_mut_ptr() as *mut _,
                        &mut size,
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }

                Ok(buf)
            });

            match result {
                Ok(bytes) => {
                    let settings: Settings =
                        postcard::from_bytes(&bytes).map_err(|_| SettingsError::Corrupted)?;
                    info!("SettingsStore: loaded settings from NVS ({} bytes)", bytes.len());
                    Ok(settings)
                }
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(SettingsError::NotFound),
                Err(e) => {
                    warn!("SettingsStore: NVS read error {}", e);
                    Err(SettingsError::IoError)
                }
            }
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate().map_err(SettingsError::ValidationFailed)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let bytes = postcard::to_allocvec(settings).map_err(|_| SettingsError::IoError)?;
            *self.blob.borrow_mut() = Some(bytes);
            info!("SettingsStore: settings saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let bytes = postcard::to_allocvec(settings).map_err(|_| SettingsError::IoError)?;
            let result = Self::with_nvs_handle(SETTINGS_NAMESPACE, true, |handle| {
                let ret = unsafe {
                    nvs_set_blob(
                        handle,
                        SETTINGS_KEY.as_ptr() as *const _,
                        bytes.as_ptr() as *const _,
                        bytes.len(),
                    )
                };
                if ret != ESP_OK {
                    return Err(ret);
                }
                let ret = unsafe { nvs_commit(handle) };
                if ret != ESP_OK {
                    return Err(ret);
                }
                Ok(())
            });
            match result {
                Ok(()) => {
                    info!("SettingsStore: settings saved to NVS ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) if e == ESP_ERR_NVS_NOT_ENOUGH_SPACE => Err(SettingsError::StorageFull),
                Err(e) => {
                    warn!("SettingsStore: NVS write error {}", e);
                    Err(SettingsError::IoError)
                }
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        // Only use as a last-resort fallback when NVS is unavailable.
        Self::new().unwrap_or_else(|_| Self {
            #[cfg(not(target_os = "espidf"))]
            blob: std::cell::RefCell::new(None),
        })
    }
}
