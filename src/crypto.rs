//! # Cryptography module

use zeroize::Zeroizing;

// Symmetric

pub mod aes_kw;
pub mod sym;

// Session key unwrapping

pub mod ecdh;
pub mod rsa;

// Misc

pub mod checksum;
pub mod ecc_curve;
pub mod hash;
pub mod public_key;

/// Describes keys that can decrypt data.
pub trait Decryptor {
    type EncryptionFields<'a>;

    fn decrypt(&self, data: Self::EncryptionFields<'_>) -> crate::errors::Result<Zeroizing<Vec<u8>>>;
}
