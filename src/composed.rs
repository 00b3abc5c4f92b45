//! Handle OpenPGP objects that are composed of multiple packets: key blocks
//! holding secret keys, and encrypted messages.
//!
//! See <https://www.rfc-editor.org/rfc/rfc9580#name-packet-sequence-composition>

mod decrypt;
mod key_ring;
mod literal;
mod message;
mod session_key;
mod shared;
mod unwrapper;

pub use self::{
    decrypt::MessageDecryptor,
    key_ring::{KeyRing, KeyStore, KeySummary, SecretKeyEntry},
    literal::DecryptedMessage,
    message::{EncryptedData, EncryptedMessage},
    session_key::{resolve, select_recipient, PlainSessionKey},
    unwrapper::Unwrapper,
};
