// ============================================
// File: crates/swapwire-node/src/services/key_manager.rs
// ============================================
//! # Key Manager Service
//!
//! ## Creation Reason
//! Single place that turns stored PKCS#1 bytes back into usable keys,
//! so callers never touch the raw key store.
//!
//! ## Main Functionality
//! - Generate (and optionally persist) RSA key pairs
//! - Look up our key pairs by interface id
//! - Store and look up counterparty public keys
//!
//! ## ⚠️ Important Note for Next Developer
//! - Key generation takes a noticeable amount of CPU. Call it from
//!   `spawn_blocking` inside hot async paths.
//! - A stored key pair also answers public key lookups
//!
//! ## Last Modified
//! v0.1.0 - Initial key manager

use std::sync::Arc;

use tracing::{debug, info};

use swapwire_common::InterfaceId;
use swapwire_core::crypto::{KeyPair, PublicKey};

use crate::error::Result;
use crate::keystore::{KeyStore, MemoryKeyStore, StoredKey};

/// Generates, stores and retrieves key material.
pub struct KeyManagerService {
    store: Arc<dyn KeyStore>,
}

impl KeyManagerService {
    /// Creates a key manager over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self { store }
    }

    /// Creates a key manager with an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyStore::new()))
    }

    /// Generates a 2048-bit RSA key pair, persisting it if `store` is set.
    ///
    /// # Errors
    /// Returns error if generation or persisting fails.
    pub fn generate_key_pair(&self, store: bool) -> Result<KeyPair> {
        let key_pair = KeyPair::generate()?;
        if store {
            self.store.put(StoredKey::from_key_pair(&key_pair)?)?;
            info!(interface_id = %key_pair.interface_id(), "Stored new key pair");
        }
        debug!(interface_id = %key_pair.interface_id(), "Generated key pair");
        Ok(key_pair)
    }

    /// Persists an existing key pair.
    ///
    /// # Errors
    /// Returns error if the key cannot be encoded or persisted.
    pub fn import_key_pair(&self, key_pair: &KeyPair) -> Result<()> {
        if self.store.put(StoredKey::from_key_pair(key_pair)?)? {
            info!(interface_id = %key_pair.interface_id(), "Imported key pair");
        }
        Ok(())
    }

    /// Returns our key pair for `interface_id`, if we hold one.
    ///
    /// # Errors
    /// Returns error if the stored bytes are corrupt.
    pub fn get_key_pair(&self, interface_id: &InterfaceId) -> Result<Option<KeyPair>> {
        let Some(stored) = self.store.get(interface_id) else {
            debug!(interface_id = %interface_id, "Key pair not found");
            return Ok(None);
        };
        stored.to_key_pair()
    }

    /// Stores a counterparty public key. Already known ids are left alone.
    ///
    /// # Errors
    /// Returns error if persisting fails.
    pub fn store_public_key(&self, public_key: &PublicKey) -> Result<()> {
        if self.store.put(StoredKey::from_public_key(public_key))? {
            info!(interface_id = %public_key.interface_id(), "Stored public key");
        }
        Ok(())
    }

    /// Returns the public key for `interface_id`, if known.
    ///
    /// # Errors
    /// Returns error if the stored bytes are corrupt.
    pub fn get_public_key(&self, interface_id: &InterfaceId) -> Result<Option<PublicKey>> {
        self.store
            .get(interface_id)
            .map(|stored| stored.to_public_key())
            .transpose()
    }
}

impl std::fmt::Debug for KeyManagerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManagerService")
            .field("entries", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_lookup() {
        let manager = KeyManagerService::in_memory();
        let key_pair = manager.generate_key_pair(true).unwrap();

        let restored = manager.get_key_pair(key_pair.interface_id()).unwrap().unwrap();
        assert_eq!(restored.public_key_pkcs1(), key_pair.public_key_pkcs1());

        let signature = restored.sign(b"swap").unwrap();
        assert!(key_pair.verify(b"swap", &signature).unwrap());

        // The key pair also answers public key lookups
        let public = manager.get_public_key(key_pair.interface_id()).unwrap().unwrap();
        assert_eq!(public.interface_id(), key_pair.interface_id());

        // Public keys are stored without the private half
        let other = KeyManagerService::in_memory();
        other.store_public_key(key_pair.public_key()).unwrap();
        assert!(other.get_public_key(key_pair.interface_id()).unwrap().is_some());
        assert!(other.get_key_pair(key_pair.interface_id()).unwrap().is_none());

        // Unstored generation leaves the store untouched
        let ephemeral = other.generate_key_pair(false).unwrap();
        assert!(other.get_key_pair(ephemeral.interface_id()).unwrap().is_none());
        assert!(other.get_public_key(ephemeral.interface_id()).unwrap().is_none());
    }

    #[test]
    fn test_unknown_id() {
        let manager = KeyManagerService::in_memory();
        let id = InterfaceId::from_bytes([1; 32]);
        assert!(manager.get_key_pair(&id).unwrap().is_none());
        assert!(manager.get_public_key(&id).unwrap().is_none());
    }
}
