use std::collections::HashMap;

use bytes::Bytes;
use log::{debug, warn};

use crate::armor::{BlockType, Dearmor};
use crate::composed::shared::filter_parsed_packet_results;
use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{Error, Result};
use crate::packet::{Packet, PacketReader, SecretKey};
use crate::types::{Fingerprint, KeyId, Password, SecretKeyRepr, SecretParams};

/// A single secret key or subkey of a key ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyEntry {
    key: SecretKey,
    primary: bool,
}

impl SecretKeyEntry {
    pub fn key_id(&self) -> KeyId {
        self.key.key_id()
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.key.fingerprint()
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.key.algorithm()
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    /// Whether unlocking this key needs a passphrase.
    ///
    /// GnuPG stubs carry no secret material, so no passphrase can help them.
    pub fn requires_passphrase(&self) -> bool {
        let params = self.key.secret_params();
        params.is_encrypted() && !params.is_dummy()
    }

    /// Produces the usable secret key, decrypting it with `pw` if it is protected.
    pub fn unlock(&self, pw: &Password) -> Result<SecretKeyRepr> {
        let key_id = self.key_id();
        match self.key.secret_params() {
            SecretParams::Plain(params) => {
                if !pw.is_empty() {
                    debug!("secret key {} is not protected, ignoring passphrase", key_id);
                }
                params.as_repr(self.key.public_params())
            }
            SecretParams::Encrypted(params) => {
                if params.string_to_key().is_gnu_dummy() {
                    return Err(Error::session_key(format!(
                        "secret key {key_id} is a stub without secret material"
                    )));
                }
                debug!(
                    "unlocking secret key {} ({:?}, {:?})",
                    key_id,
                    params.encryption_algorithm(),
                    params.string_to_key()
                );
                let plain = params.unlock(pw, self.algorithm(), key_id)?;
                plain.as_repr(self.key.public_params())
            }
        }
    }
}

/// A primary secret key and its secret subkeys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRing {
    entries: Vec<SecretKeyEntry>,
}

impl KeyRing {
    pub fn primary(&self) -> Option<&SecretKeyEntry> {
        self.entries.iter().find(|e| e.is_primary())
    }

    /// The primary key first, then the subkeys in the order they were found.
    pub fn entries(&self) -> impl Iterator<Item = &SecretKeyEntry> {
        self.entries.iter()
    }
}

/// Diagnostic view of a secret key, free of secret material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySummary {
    pub key_id: KeyId,
    pub fingerprint: Fingerprint,
    pub algorithm: PublicKeyAlgorithm,
    pub primary: bool,
    pub protected: bool,
    pub created_at: u32,
}

/// All secret keys of a key block, in the order they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStore {
    rings: Vec<KeyRing>,
    /// Ring and entry position of each key id, the first occurrence wins.
    index: HashMap<KeyId, (usize, usize)>,
}

impl KeyStore {
    /// Parses an armored private key block.
    pub fn from_armor(input: &str) -> Result<Self> {
        let armored = Dearmor::decode(input)?;
        armored.ensure_type(&[BlockType::PrivateKey, BlockType::PublicKey])?;
        Self::from_bytes(armored.data)
    }

    /// Parses binary transferable secret keys.
    ///
    /// Fails with [`Error::NoKeyMaterial`] if not a single secret key is found.
    pub fn from_bytes(input: impl Into<Bytes>) -> Result<Self> {
        let input: Bytes = input.into();
        let mut rings: Vec<KeyRing> = Vec::new();

        for packet in PacketReader::new(&input[..]).filter_map(filter_parsed_packet_results) {
            match packet? {
                Packet::SecretKey(key) => {
                    debug!("found secret key {}", key.key_id());
                    rings.push(KeyRing {
                        entries: vec![SecretKeyEntry { key, primary: true }],
                    });
                }
                Packet::SecretSubkey(key) => {
                    debug!("found secret subkey {}", key.key_id());
                    let entry = SecretKeyEntry {
                        key,
                        primary: false,
                    };
                    match rings.last_mut() {
                        Some(ring) => ring.entries.push(entry),
                        None => {
                            warn!("secret subkey {} without a primary key", entry.key_id());
                            rings.push(KeyRing {
                                entries: vec![entry],
                            });
                        }
                    }
                }
                other => {
                    debug!("ignoring {:?} packet in key block", other.tag());
                }
            }
        }

        if rings.is_empty() {
            return Err(Error::NoKeyMaterial);
        }
        let mut index = HashMap::new();
        for (r, ring) in rings.iter().enumerate() {
            for (e, entry) in ring.entries.iter().enumerate() {
                let key_id = entry.key_id();
                if index.contains_key(&key_id) {
                    debug!("duplicate secret key {}, keeping the first", key_id);
                    continue;
                }
                index.insert(key_id, (r, e));
            }
        }
        debug!(
            "key block with {} rings and {} secret keys",
            rings.len(),
            rings.iter().map(|r| r.entries.len()).sum::<usize>()
        );

        Ok(KeyStore { rings, index })
    }

    pub fn rings(&self) -> &[KeyRing] {
        &self.rings
    }

    /// Every secret key of every ring, in ring order.
    pub fn entries(&self) -> impl Iterator<Item = &SecretKeyEntry> {
        self.rings.iter().flat_map(|r| r.entries())
    }

    pub fn get(&self, key_id: &KeyId) -> Option<&SecretKeyEntry> {
        let (r, e) = self.index.get(key_id)?;
        self.rings.get(*r)?.entries.get(*e)
    }

    pub fn first(&self) -> Option<&SecretKeyEntry> {
        self.entries().next()
    }

    /// Whether the first secret key needs a passphrase to be unlocked.
    pub fn requires_passphrase(&self) -> bool {
        self.first().is_some_and(SecretKeyEntry::requires_passphrase)
    }

    pub fn summaries(&self) -> Vec<KeySummary> {
        self.entries()
            .map(|e| KeySummary {
                key_id: e.key_id(),
                fingerprint: e.fingerprint(),
                algorithm: e.algorithm(),
                primary: e.is_primary(),
                protected: e.requires_passphrase(),
                created_at: e.key.created_at(),
            })
            .collect()
    }
}
