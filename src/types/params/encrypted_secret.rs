use bytes::Bytes;
use log::debug;
use zeroize::Zeroizing;

use crate::crypto::{checksum, public_key::PublicKeyAlgorithm, sym::SymmetricKeyAlgorithm};
use crate::errors::{Error, Result};
use crate::types::{KeyId, Password, PlainSecretParams, S2kUsage, StringToKey};

/// Passphrase protected secret key material.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct EncryptedSecretParams {
    /// The encrypted data.
    #[debug("{} bytes", data.len())]
    data: Bytes,
    /// IV.
    #[debug("{}", hex::encode(iv))]
    iv: Bytes,
    /// The encryption algorithm used.
    encryption_algorithm: SymmetricKeyAlgorithm,
    /// The string-to-key method and its parameters.
    string_to_key: StringToKey,
    /// The identifier for how this data is stored.
    usage: S2kUsage,
}

impl EncryptedSecretParams {
    pub fn new(
        data: Bytes,
        iv: Bytes,
        alg: SymmetricKeyAlgorithm,
        s2k: StringToKey,
        usage: S2kUsage,
    ) -> Self {
        EncryptedSecretParams {
            data,
            iv,
            encryption_algorithm: alg,
            string_to_key: s2k,
            usage,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn encryption_algorithm(&self) -> SymmetricKeyAlgorithm {
        self.encryption_algorithm
    }

    pub fn string_to_key(&self) -> &StringToKey {
        &self.string_to_key
    }

    pub fn usage(&self) -> S2kUsage {
        self.usage
    }

    /// Decrypts the secret material with the passphrase.
    ///
    /// A failed integrity check of the decrypted material means the passphrase
    /// is wrong. With an empty passphrase that is reported as
    /// [`Error::PassphraseRequired`], otherwise as [`Error::WrongPassphrase`].
    pub fn unlock(
        &self,
        pw: &Password,
        alg: PublicKeyAlgorithm,
        key_id: KeyId,
    ) -> Result<PlainSecretParams> {
        let rejected = || {
            if pw.is_empty() {
                Error::PassphraseRequired { key_id }
            } else {
                Error::WrongPassphrase { key_id }
            }
        };

        let key = self
            .string_to_key
            .derive_key(pw.as_bytes(), self.encryption_algorithm.key_size())?;

        let mut plaintext = Zeroizing::new(self.data.to_vec());
        self.encryption_algorithm
            .decrypt_with_iv_regular(&key, &self.iv, &mut plaintext)?;

        let material = match self.usage {
            S2kUsage::Cfb => {
                let Some(split) = plaintext.len().checked_sub(20) else {
                    return Err(rejected());
                };
                let (material, hash) = plaintext.split_at(split);
                if !checksum::verify_sha1(hash, material) {
                    debug!("secret key {}: SHA1 mismatch", key_id);
                    return Err(rejected());
                }
                material
            }
            _ => {
                let Some(split) = plaintext.len().checked_sub(2) else {
                    return Err(rejected());
                };
                let (material, cs) = plaintext.split_at(split);
                if !checksum::verify_simple(cs, material) {
                    debug!("secret key {}: checksum mismatch", key_id);
                    return Err(rejected());
                }
                material
            }
        };

        let params = PlainSecretParams::new(material);
        if !params.is_well_formed(alg) {
            // the two octet checksum matches by chance for some wrong passphrases
            return Err(rejected());
        }

        Ok(params)
    }
}
