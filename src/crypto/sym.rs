use aes::{Aes128, Aes192, Aes256};
use blowfish::Blowfish;
use camellia::{Camellia128, Camellia192, Camellia256};
use cast5::Cast5;
use cfb_mode::{
    cipher::{AsyncStreamCipher, KeyIvInit},
    Decryptor,
};
use cipher::{BlockCipher, BlockEncryptMut};
use des::TdesEde3;
use idea::Idea;
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};
use sha1::{Digest, Sha1};
use twofish::Twofish;

use crate::errors::{bail, unsupported_err, Error, Result};

/// MDC is 1 byte packet tag, 1 byte length prefix and 20 bytes SHA1 hash.
const MDC_LEN: usize = 22;

fn decrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: BlockEncryptMut + BlockCipher,
    Decryptor<C>: KeyIvInit,
{
    Decryptor::<C>::new_from_slices(key, iv)?.decrypt(data);
    Ok(())
}

/// Available symmetric key algorithms.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-symmetric-key-algorithms>
#[derive(Debug, PartialEq, Eq, Copy, Clone, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum SymmetricKeyAlgorithm {
    /// Plaintext or unencrypted data
    Plaintext = 0,
    /// IDEA
    IDEA = 1,
    /// Triple-DES
    TripleDES = 2,
    /// CAST5
    CAST5 = 3,
    /// Blowfish
    Blowfish = 4,
    // 5 & 6 are reserved for DES/SK
    /// AES with 128-bit key
    AES128 = 7,
    /// AES with 192-bit key
    AES192 = 8,
    /// AES with 256-bit key
    AES256 = 9,
    /// Twofish with 256-bit key
    Twofish = 10,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 128-bit key
    Camellia128 = 11,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 192-bit key
    Camellia192 = 12,
    /// [Camellia](https://tools.ietf.org/html/rfc5581#section-3) with 256-bit key
    Camellia256 = 13,

    #[num_enum(catch_all)]
    Other(u8),
}

#[allow(clippy::derivable_impls)]
impl Default for SymmetricKeyAlgorithm {
    fn default() -> Self {
        Self::AES128
    }
}

impl SymmetricKeyAlgorithm {
    /// The size of a single block in bytes.
    /// Based on <https://github.com/gpg/libgcrypt/blob/master/cipher>
    pub fn block_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA => 8,
            SymmetricKeyAlgorithm::TripleDES => 8,
            SymmetricKeyAlgorithm::CAST5 => 8,
            SymmetricKeyAlgorithm::Blowfish => 8,
            SymmetricKeyAlgorithm::AES128 => 16,
            SymmetricKeyAlgorithm::AES192 => 16,
            SymmetricKeyAlgorithm::AES256 => 16,
            SymmetricKeyAlgorithm::Twofish => 16,
            SymmetricKeyAlgorithm::Camellia128 => 16,
            SymmetricKeyAlgorithm::Camellia192 => 16,
            SymmetricKeyAlgorithm::Camellia256 => 16,
            SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    /// The size of the key in bytes, 0 for algorithms we can not use.
    pub const fn key_size(self) -> usize {
        match self {
            SymmetricKeyAlgorithm::Plaintext => 0,
            SymmetricKeyAlgorithm::IDEA => 16,
            SymmetricKeyAlgorithm::TripleDES => 24,
            SymmetricKeyAlgorithm::CAST5 => 16,
            SymmetricKeyAlgorithm::Blowfish => 16,
            SymmetricKeyAlgorithm::AES128 => 16,
            SymmetricKeyAlgorithm::AES192 => 24,
            SymmetricKeyAlgorithm::AES256 => 32,
            SymmetricKeyAlgorithm::Twofish => 32,
            SymmetricKeyAlgorithm::Camellia128 => 16,
            SymmetricKeyAlgorithm::Camellia192 => 24,
            SymmetricKeyAlgorithm::Camellia256 => 32,
            SymmetricKeyAlgorithm::Other(_) => 0,
        }
    }

    /// Decrypt the data using CFB mode, without padding. Overwrites the input.
    /// This is regular CFB, not OpenPgP CFB.
    pub fn decrypt_with_iv_regular(
        self,
        key: &[u8],
        iv_vec: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<()> {
        match self {
            SymmetricKeyAlgorithm::Plaintext => {
                bail!("'Plaintext' is not a legal cipher for encrypted data")
            }
            SymmetricKeyAlgorithm::IDEA => decrypt::<Idea>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::TripleDES => decrypt::<TdesEde3>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::CAST5 => decrypt::<Cast5>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Blowfish => decrypt::<Blowfish>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::AES128 => decrypt::<Aes128>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::AES192 => decrypt::<Aes192>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::AES256 => decrypt::<Aes256>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Twofish => decrypt::<Twofish>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Camellia128 => decrypt::<Camellia128>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Camellia192 => decrypt::<Camellia192>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Camellia256 => decrypt::<Camellia256>(key, iv_vec, ciphertext),
            SymmetricKeyAlgorithm::Other(_) => {
                unsupported_err!("SymmetricKeyAlgorithm {} is unsupported", u8::from(self))
            }
        }
    }

    /// Decrypts the body of a version 1 integrity protected packet and verifies its MDC.
    ///
    /// The whole body is regular CFB with an all zero IV. On success the
    /// range of `ciphertext` holding the plaintext (without the random prefix
    /// and the MDC) is returned. Nothing of the plaintext may be used if the
    /// MDC does not match.
    ///
    /// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-version-1-symmetrically-enc>
    pub fn decrypt_protected(
        self,
        key: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<std::ops::Range<usize>> {
        debug!("protected decrypt");

        let bs = self.block_size();
        if bs == 0 {
            unsupported_err!("SymmetricKeyAlgorithm {} is unsupported", u8::from(self));
        }
        let prefix_len = bs + 2;
        if ciphertext.len() < prefix_len + MDC_LEN {
            return Err(Error::integrity(format!(
                "encrypted data of {} bytes is too short for its prefix and MDC",
                ciphertext.len()
            )));
        }

        let iv_vec = vec![0u8; bs];
        self.decrypt_with_iv_regular(key, &iv_vec, ciphertext)?;

        // The quick check bytes are not verified, they leak information
        // about the session key.
        let mdc_start = ciphertext.len() - MDC_LEN;
        if ciphertext[mdc_start..mdc_start + 2] != [0xD3, 0x14] {
            return Err(Error::integrity("missing MDC packet"));
        }
        let expected = Sha1::digest(&ciphertext[..mdc_start + 2]);
        if expected[..] != ciphertext[mdc_start + 2..] {
            return Err(Error::integrity("MDC does not match"));
        }

        Ok(prefix_len..mdc_start)
    }

    /// Decrypts a legacy symmetrically encrypted body, using OpenPGP CFB with resync.
    ///
    /// The first `bs + 2` octets are decrypted with an all zero IV, the rest
    /// with the IV set to ciphertext octets `2..bs + 2`. Returns the range of
    /// the plaintext.
    ///
    /// Ref: <https://www.rfc-editor.org/rfc/rfc4880.html#section-13.9>
    pub fn decrypt_unprotected(
        self,
        key: &[u8],
        ciphertext: &mut [u8],
    ) -> Result<std::ops::Range<usize>> {
        debug!("unprotected decrypt");

        let bs = self.block_size();
        if bs == 0 {
            unsupported_err!("SymmetricKeyAlgorithm {} is unsupported", u8::from(self));
        }
        let prefix_len = bs + 2;
        if ciphertext.len() < prefix_len {
            return Err(Error::invalid_packet(format!(
                "encrypted data of {} bytes is too short for its prefix",
                ciphertext.len()
            )));
        }

        let (prefix, data) = ciphertext.split_at_mut(prefix_len);
        let resync_iv = prefix[2..].to_vec();

        let iv_vec = vec![0u8; bs];
        self.decrypt_with_iv_regular(key, &iv_vec, prefix)?;
        self.decrypt_with_iv_regular(key, &resync_iv, data)?;

        Ok(prefix_len..ciphertext.len())
    }
}
