//! Application context: client-side key-value storage plus the resolved
//! business profile.
//!
//! Screens receive the context explicitly instead of reaching for ambient
//! storage. Storage keys match what earlier clients persisted, so an
//! existing storage file keeps working.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::BarberProfile;
use crate::phone;

pub const TOKEN_KEY: &str = "barberToken";
pub const THEME_KEY: &str = "bbTheme";
pub const PUBLIC_PHONE_KEY_PREFIX: &str = "barberBookPublicPhone";

/// Storage key of the phone remembered for one business's public page.
pub fn public_phone_key(business_id: &str) -> String {
    format!("{PUBLIC_PHONE_KEY_PREFIX}:{business_id}")
}

/// String key-value storage surviving restarts (or not, for [`MemoryStore`]).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// A JSON object on disk, rewritten after every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        debug!(path = %path.display(), keys = entries.len(), "Opened client storage");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let result = serde_json::to_vec_pretty(entries)
            .map_err(io::Error::from)
            .and_then(|bytes| {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, bytes)
            });
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to write client storage");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Shared session state for one client.
pub struct AppContext {
    store: Arc<dyn KeyValueStore>,
    profile: RwLock<Option<BarberProfile>>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("has_token", &self.token().is_some())
            .field("profile", &*self.profile.read())
            .finish()
    }
}

impl AppContext {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            profile: RwLock::new(None),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(TOKEN_KEY, token);
    }

    pub fn clear_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    pub fn profile(&self) -> Option<BarberProfile> {
        self.profile.read().clone()
    }

    pub fn set_profile(&self, profile: BarberProfile) {
        *self.profile.write() = Some(profile);
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.read().is_some()
    }

    /// Stores the token and profile returned by login or signup.
    pub fn sign_in(&self, token: &str, profile: BarberProfile) {
        self.set_token(token);
        self.set_profile(profile);
    }

    pub fn sign_out(&self) {
        self.clear_token();
        *self.profile.write() = None;
    }

    /// Anything other than a stored `dark` reads as light.
    pub fn theme(&self) -> Theme {
        match self.store.get(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set(THEME_KEY, theme.as_str());
    }

    pub fn remembered_phone(&self, business_id: &str) -> Option<String> {
        self.store.get(&public_phone_key(business_id))
    }

    /// Remembers `phone` for the business page while it is a valid number;
    /// anything else clears the remembered value.
    pub fn remember_phone(&self, business_id: &str, phone: &str) {
        let key = public_phone_key(business_id);
        match phone::normalize_international(phone) {
            Some(valid) => self.store.set(&key, &valid),
            None => self.store.remove(&key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BarberProfile {
        serde_json::from_value(serde_json::json!({ "id": "b1", "name": "Rauf" })).unwrap()
    }

    #[test]
    fn sign_in_and_out_manage_token_and_profile() {
        let ctx = AppContext::in_memory();
        assert!(ctx.token().is_none());
        assert!(!ctx.is_authenticated());

        ctx.sign_in("tok", profile());
        assert_eq!(ctx.token().as_deref(), Some("tok"));
        assert_eq!(ctx.profile().unwrap().id, "b1");

        ctx.sign_out();
        assert!(ctx.token().is_none());
        assert!(ctx.profile().is_none());
    }

    #[test]
    fn theme_defaults_to_light() {
        let ctx = AppContext::in_memory();
        assert_eq!(ctx.theme(), Theme::Light);

        ctx.set_theme(Theme::Dark);
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn remembered_phone_is_kept_only_while_valid() {
        let ctx = AppContext::in_memory();

        ctx.remember_phone("b1", "+994 50 123 45 67");
        assert_eq!(ctx.remembered_phone("b1").as_deref(), Some("+994501234567"));
        assert!(ctx.remembered_phone("b2").is_none());

        ctx.remember_phone("b1", "+99450");
        assert!(ctx.remembered_phone("b1").is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set(TOKEN_KEY, "abc");
            store.set(&public_phone_key("b1"), "+994501234567");
            store.remove(&public_phone_key("b1"));
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert!(reopened.get(&public_phone_key("b1")).is_none());
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(FileStore::open(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
    }
}
