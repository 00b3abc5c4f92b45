//! # pgp-decrypt
//!
//! Decryption of OpenPGP messages with secret keys from a private key block.
//!
//! The pipeline decodes the ASCII armor of both inputs, collects the secret
//! keys and subkeys of every key ring, matches the public key encrypted session
//! key packets of the message against them, unlocks the chosen key with the
//! passphrase, unwraps the session key, decrypts and integrity checks the
//! payload and finally walks through signature and compression framing down to
//! the literal data.
//!
//! ```no_run
//! let key_block = std::fs::read_to_string("key.asc")?;
//! let message = std::fs::read_to_string("message.asc")?;
//!
//! if pgp_decrypt::requires_passphrase(&key_block)? {
//!     // ask the user
//! }
//! let plaintext = pgp_decrypt::decrypt(&key_block, &message, "passphrase")?;
//! println!("{plaintext}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Supported are RSA and ECDH (Curve25519) secret keys, protected with the
//! usual string-to-key methods, and version 1 integrity protected data.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod armor;
pub mod composed;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod packet;
pub mod types;

mod parsing;
mod parsing_reader;

pub use self::composed::{DecryptedMessage, KeyStore, MessageDecryptor};
pub use self::config::DecryptOptions;
pub use self::errors::{Error, ErrorKind, Result};
pub use self::types::Password;

/// Decrypts an armored message and returns its text.
///
/// An empty `passphrase` means none was given: protected keys then fail with
/// [`Error::PassphraseRequired`] instead of [`Error::WrongPassphrase`]. The
/// passphrase is ignored for keys that are not protected.
pub fn decrypt(private_key_block: &str, message: &str, passphrase: &str) -> Result<String> {
    MessageDecryptor::default().decrypt(private_key_block, message, &Password::from(passphrase))
}

/// Whether the first secret key of the key block is protected by a passphrase.
///
/// Nothing is decrypted, the key block is only parsed.
pub fn requires_passphrase(private_key_block: &str) -> Result<bool> {
    let keys = KeyStore::from_armor(private_key_block)?;
    Ok(keys.requires_passphrase())
}
