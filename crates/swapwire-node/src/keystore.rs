// ============================================
// File: crates/swapwire-node/src/keystore.rs
// ============================================
//! # Key Store
//!
//! ## Creation Reason
//! Key pairs must survive restarts so a node can still read messages
//! addressed to interface ids it announced earlier. Counterparty public
//! keys are kept alongside them.
//!
//! ## Main Functionality
//! - `StoredKey`: PKCS#1 key material indexed by interface id
//! - `KeyStore`: get/put storage boundary
//! - `MemoryKeyStore`: DashMap-backed, for tests and ephemeral nodes
//! - `FileKeyStore`: JSON file, rewritten atomically on every insert
//!
//! ## Key File Format
//! ```json
//! {
//!   "version": "1.0",
//!   "keys": {
//!     "<base64 interface id>": {
//!       "public_key": "<base64 PKCS#1>",
//!       "private_key": "<base64 PKCS#1 or absent>"
//!     }
//!   }
//! }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `put` never overwrites. The only change it makes to an existing
//!   entry is adding the private half to a public-only entry.
//! - The key file holds private keys in the clear; it is created `0o600`
//! - Private key buffers are `Zeroizing` in memory
//!
//! ## Last Modified
//! v0.1.0 - Initial key store

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use swapwire_common::InterfaceId;
use swapwire_core::crypto::{interface_id_of, KeyPair, PublicKey};

use crate::error::{NodeError, Result};

// ============================================
// StoredKey
// ============================================

/// Key material for one interface id.
#[derive(Clone)]
pub struct StoredKey {
    /// SHA-256 of `public_key_pkcs1`
    pub interface_id: InterfaceId,
    /// PKCS#1 DER public key
    pub public_key_pkcs1: Vec<u8>,
    /// PKCS#1 DER private key, present for our own key pairs
    pub private_key_pkcs1: Option<Zeroizing<Vec<u8>>>,
}

impl StoredKey {
    /// Captures both halves of `key_pair`.
    ///
    /// # Errors
    /// Returns error if the private key cannot be encoded.
    pub fn from_key_pair(key_pair: &KeyPair) -> Result<Self> {
        Ok(Self {
            interface_id: *key_pair.interface_id(),
            public_key_pkcs1: key_pair.public_key_pkcs1().to_vec(),
            private_key_pkcs1: Some(key_pair.private_key_pkcs1()?),
        })
    }

    /// Captures a counterparty public key.
    #[must_use]
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self {
            interface_id: *public_key.interface_id(),
            public_key_pkcs1: public_key.to_pkcs1().to_vec(),
            private_key_pkcs1: None,
        }
    }

    /// Checks if this entry is one of our own key pairs.
    #[must_use]
    pub const fn has_private_key(&self) -> bool {
        self.private_key_pkcs1.is_some()
    }

    /// Restores the key pair, or `None` for a public-only entry.
    ///
    /// # Errors
    /// Returns error if the stored bytes are not a matching RSA key pair.
    pub fn to_key_pair(&self) -> Result<Option<KeyPair>> {
        self.private_key_pkcs1
            .as_ref()
            .map(|private| KeyPair::restore(&self.public_key_pkcs1, private))
            .transpose()
            .map_err(Into::into)
    }

    /// Restores the public key.
    ///
    /// # Errors
    /// Returns error if the stored bytes are not an RSA public key.
    pub fn to_public_key(&self) -> Result<PublicKey> {
        Ok(PublicKey::from_pkcs1(&self.public_key_pkcs1)?)
    }
}

impl fmt::Debug for StoredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredKey")
            .field("interface_id", &self.interface_id)
            .field("has_private_key", &self.has_private_key())
            .finish_non_exhaustive()
    }
}

// ============================================
// KeyStore Trait
// ============================================

/// Storage for key material indexed by interface id.
pub trait KeyStore: Send + Sync {
    /// Returns the entry for `interface_id`.
    fn get(&self, interface_id: &InterfaceId) -> Option<StoredKey>;

    /// Stores `key` unless its interface id is already present.
    ///
    /// Returns `true` if anything changed.
    ///
    /// # Errors
    /// Returns error if the backing storage cannot be written.
    fn put(&self, key: StoredKey) -> Result<bool>;

    /// Returns the number of entries.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decides what `put` does with an existing entry.
fn merge(existing: &StoredKey, incoming: &StoredKey) -> Option<StoredKey> {
    if existing.has_private_key() || !incoming.has_private_key() {
        return None;
    }
    Some(incoming.clone())
}

// ============================================
// MemoryKeyStore
// ============================================

/// In-memory key store.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: DashMap<InterfaceId, StoredKey>,
}

impl MemoryKeyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, interface_id: &InterfaceId) -> Option<StoredKey> {
        self.keys.get(interface_id).map(|r| r.value().clone())
    }

    fn put(&self, key: StoredKey) -> Result<bool> {
        match self.keys.entry(key.interface_id) {
            Entry::Vacant(slot) => {
                slot.insert(key);
                Ok(true)
            }
            Entry::Occupied(mut slot) => match merge(slot.get(), &key) {
                Some(upgraded) => {
                    slot.insert(upgraded);
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

// ============================================
// FileKeyStore
// ============================================

const KEY_FILE_VERSION: &str = "1.0";

#[derive(Serialize, Deserialize)]
struct KeyFile {
    version: String,
    keys: BTreeMap<String, KeyFileEntry>,
}

#[derive(Serialize, Deserialize)]
struct KeyFileEntry {
    public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
}

/// Key store persisted as a JSON file.
pub struct FileKeyStore {
    path: PathBuf,
    keys: RwLock<BTreeMap<InterfaceId, StoredKey>>,
}

impl FileKeyStore {
    /// Opens the key file at `path`, starting empty if it does not exist.
    ///
    /// Entries whose interface id does not match their public key are
    /// skipped with a warning.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let keys = if path.exists() {
            Self::read(&path)?
        } else {
            debug!(path = %path.display(), "Key file not found, starting empty");
            BTreeMap::new()
        };

        info!(path = %path.display(), entries = keys.len(), "Key store opened");
        Ok(Self {
            path,
            keys: RwLock::new(keys),
        })
    }

    /// Returns the key file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<InterfaceId, StoredKey>> {
        let path_str = path.display().to_string();
        let content = Zeroizing::new(
            std::fs::read_to_string(path).map_err(|e| NodeError::key_store(&path_str, e.to_string()))?,
        );
        let file: KeyFile = serde_json::from_str(&content)
            .map_err(|e| NodeError::key_store(&path_str, e.to_string()))?;

        let mut keys = BTreeMap::new();
        for (id, entry) in file.keys {
            match Self::decode_entry(&id, &entry) {
                Some(key) => {
                    keys.insert(key.interface_id, key);
                }
                None => warn!(path = %path_str, interface_id = %id, "Skipping invalid key file entry"),
            }
        }
        Ok(keys)
    }

    fn decode_entry(id: &str, entry: &KeyFileEntry) -> Option<StoredKey> {
        let interface_id: InterfaceId = id.parse().ok()?;
        let public_key_pkcs1 = BASE64.decode(&entry.public_key).ok()?;
        if interface_id_of(&public_key_pkcs1) != interface_id {
            return None;
        }
        let private_key_pkcs1 = match &entry.private_key {
            Some(encoded) => Some(Zeroizing::new(BASE64.decode(encoded).ok()?)),
            None => None,
        };
        Some(StoredKey {
            interface_id,
            public_key_pkcs1,
            private_key_pkcs1,
        })
    }

    fn write(&self, keys: &BTreeMap<InterfaceId, StoredKey>) -> Result<()> {
        let path_str = self.path.display().to_string();
        let file = KeyFile {
            version: KEY_FILE_VERSION.to_string(),
            keys: keys
                .values()
                .map(|key| {
                    let entry = KeyFileEntry {
                        public_key: BASE64.encode(&key.public_key_pkcs1),
                        private_key: key.private_key_pkcs1.as_ref().map(|p| BASE64.encode(p.as_slice())),
                    };
                    (key.interface_id.to_base64(), entry)
                })
                .collect(),
        };
        let content = Zeroizing::new(
            serde_json::to_string_pretty(&file)
                .map_err(|e| NodeError::key_store(&path_str, e.to_string()))?,
        );
        drop(file);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write beside the target, then rename over it
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyStore for FileKeyStore {
    fn get(&self, interface_id: &InterfaceId) -> Option<StoredKey> {
        self.keys.read().get(interface_id).cloned()
    }

    fn put(&self, key: StoredKey) -> Result<bool> {
        let mut keys = self.keys.write();
        let interface_id = key.interface_id;
        let previous = match keys.get(&interface_id) {
            None => None,
            Some(existing) => match merge(existing, &key) {
                Some(_) => Some(existing.clone()),
                None => return Ok(false),
            },
        };

        keys.insert(interface_id, key);
        if let Err(e) = self.write(&keys) {
            match previous {
                Some(old) => keys.insert(interface_id, old),
                None => keys.remove(&interface_id),
            };
            return Err(e);
        }

        debug!(interface_id = %interface_id, "Key file updated");
        Ok(true)
    }

    fn len(&self) -> usize {
        self.keys.read().len()
    }
}

impl fmt::Debug for FileKeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileKeyStore")
            .field("path", &self.path)
            .field("entries", &self.len())
            .finish()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use super::*;

    fn key_pair() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| KeyPair::generate().unwrap())
    }

    #[test]
    fn test_memory_store_put_get() {
        let store = MemoryKeyStore::new();
        let key = StoredKey::from_key_pair(key_pair()).unwrap();

        assert!(store.put(key).unwrap());
        let stored = store.get(key_pair().interface_id()).unwrap();
        let restored = stored.to_key_pair().unwrap().unwrap();
        assert_eq!(restored.interface_id(), key_pair().interface_id());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_existing_is_noop() {
        let store = MemoryKeyStore::new();
        let key = StoredKey::from_key_pair(key_pair()).unwrap();
        assert!(store.put(key.clone()).unwrap());
        assert!(!store.put(key).unwrap());

        // A public-only entry never replaces the key pair
        let public = StoredKey::from_public_key(key_pair().public_key());
        assert!(!store.put(public).unwrap());
        assert!(store.get(key_pair().interface_id()).unwrap().has_private_key());
    }

    #[test]
    fn test_key_pair_upgrades_public_entry() {
        let store = MemoryKeyStore::new();
        store
            .put(StoredKey::from_public_key(key_pair().public_key()))
            .unwrap();
        let stored = store.get(key_pair().interface_id()).unwrap();
        assert!(stored.to_key_pair().unwrap().is_none());

        assert!(store.put(StoredKey::from_key_pair(key_pair()).unwrap()).unwrap());
        assert!(store.get(key_pair().interface_id()).unwrap().has_private_key());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");

        let store = FileKeyStore::open(&path).unwrap();
        assert!(store.is_empty());
        store.put(StoredKey::from_key_pair(key_pair()).unwrap()).unwrap();
        drop(store);

        let reopened = FileKeyStore::open(&path).unwrap();
        let stored = reopened.get(key_pair().interface_id()).unwrap();
        let restored = stored.to_key_pair().unwrap().unwrap();
        assert_eq!(restored.public_key_pkcs1(), key_pair().public_key_pkcs1());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keys.json");
        let store = FileKeyStore::open(&path).unwrap();
        store
            .put(StoredKey::from_public_key(key_pair().public_key()))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_skips_mismatched_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        let wrong_id = InterfaceId::from_bytes([9; 32]);
        let content = format!(
            r#"{{"version":"1.0","keys":{{"{}":{{"public_key":"{}"}}}}}}"#,
            wrong_id.to_base64(),
            BASE64.encode(key_pair().public_key_pkcs1())
        );
        std::fs::write(&path, content).unwrap();

        let store = FileKeyStore::open(&path).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileKeyStore::open(&path),
            Err(NodeError::KeyStore { .. })
        ));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let key = StoredKey::from_key_pair(key_pair()).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("has_private_key: true"));
        assert!(!debug.contains("private_key_pkcs1"));
    }
}
