use clip_library::cache::{SessionBackend, StorageError};
use web_sys::{window, Storage};

/// `window.sessionStorage` as the persistent cache tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSessionStorage;

fn session_storage() -> Result<Storage, StorageError> {
    window()
        .and_then(|w| w.session_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable)
}

impl SessionBackend for BrowserSessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        session_storage()?
            .get_item(key)
            .map_err(|_| StorageError::Read {
                key: key.to_string(),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Throws on quota exhaustion and in some private modes.
        session_storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        session_storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Write {
                key: key.to_string(),
            })
    }
}
