use bytes::Bytes;
use log::{debug, warn};
use zeroize::Zeroizing;

use crate::composed::key_ring::{KeyStore, SecretKeyEntry};
use crate::crypto::{checksum, ecdh, sym::SymmetricKeyAlgorithm, Decryptor};
use crate::errors::{unsupported_err, Error, Result};
use crate::packet::{PublicKeyEncryptedSessionKey, SymEncryptedData, SymEncryptedProtectedData};
use crate::types::{PkeskBytes, SecretKeyRepr};

/// Decrypted session key of a v3 session key packet.
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct PlainSessionKey {
    sym_alg: SymmetricKeyAlgorithm,
    #[debug("..")]
    key: Zeroizing<Vec<u8>>,
}

impl PlainSessionKey {
    pub fn new(sym_alg: SymmetricKeyAlgorithm, key: &[u8]) -> Self {
        PlainSessionKey {
            sym_alg,
            key: Zeroizing::new(key.to_vec()),
        }
    }

    /// Parses the decrypted session key block: algorithm, key and a two octet checksum.
    pub fn from_decrypted(block: &[u8]) -> Result<Self> {
        let Some((&alg, rest)) = block.split_first() else {
            return Err(Error::session_key("empty session key"));
        };
        let Some(split) = rest.len().checked_sub(2) else {
            return Err(Error::session_key("session key is too short"));
        };
        let (key, cs) = rest.split_at(split);

        let sym_alg = SymmetricKeyAlgorithm::from(alg);
        if sym_alg.key_size() == 0 {
            return Err(Error::session_key(format!(
                "invalid session key algorithm {alg}"
            )));
        }
        if key.len() != sym_alg.key_size() {
            return Err(Error::session_key(format!(
                "session key of {} bytes for {:?}",
                key.len(),
                sym_alg
            )));
        }
        if !checksum::verify_simple(cs, key) {
            return Err(Error::session_key("session key checksum mismatch"));
        }
        debug!("session key for {:?}", sym_alg);

        Ok(Self::new(sym_alg, key))
    }

    pub fn sym_alg(&self) -> SymmetricKeyAlgorithm {
        self.sym_alg
    }

    /// Decrypts a version 1 integrity protected packet, verifying the MDC before anything is returned.
    pub fn decrypt_protected(&self, packet: &SymEncryptedProtectedData) -> Result<Bytes> {
        if packet.version() != 1 {
            unsupported_err!(
                "encrypted data packet version {} (AEAD)",
                packet.version()
            );
        }
        let mut data = packet.data().to_vec();
        let range = self.sym_alg.decrypt_protected(&self.key, &mut data)?;

        Ok(Bytes::from(data).slice(range))
    }

    /// Decrypts a legacy packet that carries no integrity protection.
    pub fn decrypt_unprotected(&self, packet: &SymEncryptedData) -> Result<Bytes> {
        warn!("decrypting data without integrity protection");
        let mut data = packet.data().to_vec();
        let range = self.sym_alg.decrypt_unprotected(&self.key, &mut data)?;

        Ok(Bytes::from(data).slice(range))
    }
}

/// Picks the session key packet and the secret key to decrypt it with.
///
/// The first packet addressed to a key of the store wins. If no packet
/// matches, the first packet is paired with the first key of the store.
pub fn select_recipient<'a>(
    keys: &'a KeyStore,
    esks: &'a [PublicKeyEncryptedSessionKey],
) -> Result<(&'a PublicKeyEncryptedSessionKey, &'a SecretKeyEntry)> {
    for esk in esks {
        if let Some(entry) = keys.get(esk.id()) {
            debug!("session key packet addressed to {}", entry.key_id());
            return Ok((esk, entry));
        }
    }

    let err = Error::KeyMismatch {
        recipients: esks.iter().map(|esk| *esk.id()).collect(),
    };
    match (esks.first(), keys.first()) {
        (Some(esk), Some(entry)) => {
            warn!("{}, trying secret key {}", err, entry.key_id());
            Ok((esk, entry))
        }
        _ => Err(err),
    }
}

/// Unwraps the session key of `esk` with the unlocked secret key of `entry`.
pub fn resolve(
    entry: &SecretKeyEntry,
    repr: &SecretKeyRepr,
    esk: &PublicKeyEncryptedSessionKey,
) -> Result<PlainSessionKey> {
    debug!(
        "unwrapping session key with {} ({:?})",
        entry.key_id(),
        esk.algorithm()
    );
    let decrypted = match (repr, esk.values()) {
        (SecretKeyRepr::RSA(key), PkeskBytes::Rsa { mpi }) => key.decrypt(mpi)?,
        (
            SecretKeyRepr::ECDH(key),
            PkeskBytes::Ecdh {
                public_point,
                encrypted_session_key,
            },
        ) => key.decrypt(ecdh::EncryptionFields {
            public_point,
            encrypted_session_key: &encrypted_session_key[..],
            fingerprint: entry.fingerprint().as_bytes(),
        })?,
        _ => {
            return Err(Error::session_key(format!(
                "{:?} session key packet does not fit a {:?} key",
                esk.algorithm(),
                entry.algorithm()
            )));
        }
    };

    PlainSessionKey::from_decrypted(&decrypted)
}
