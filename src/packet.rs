//! # Packet module
//!
//! Parses the packets a decryption needs, everything else is carried as [`Packet::Other`].

mod compressed_data;
mod header;
mod literal_data;
mod one_pass_signature;
mod public_key_encrypted_session_key;
mod reader;
mod secret_key;
mod sym_encrypted_data;
mod sym_encrypted_protected_data;

use bytes::Bytes;

pub use self::{
    compressed_data::{CompressedData, Decompressor},
    header::{PacketHeader, PacketHeaderVersion},
    literal_data::{DataMode, LiteralData},
    one_pass_signature::OnePassSignature,
    public_key_encrypted_session_key::PublicKeyEncryptedSessionKey,
    reader::{PacketReader, DEFAULT_MAX_LITERAL_SIZE, DEFAULT_MAX_PACKET_SIZE},
    secret_key::SecretKey,
    sym_encrypted_data::SymEncryptedData,
    sym_encrypted_protected_data::SymEncryptedProtectedData,
};
use crate::errors::Result;
use crate::types::Tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    PublicKeyEncryptedSessionKey(PublicKeyEncryptedSessionKey),
    OnePassSignature(OnePassSignature),
    SecretKey(SecretKey),
    SecretSubkey(SecretKey),
    CompressedData(CompressedData),
    SymEncryptedData(SymEncryptedData),
    LiteralData(LiteralData),
    SymEncryptedProtectedData(SymEncryptedProtectedData),
    /// Any packet that is not interpreted, kept with its raw body.
    Other {
        tag: Tag,
        body: Bytes,
    },
}

impl Packet {
    /// Parses the body of a packet with the given tag.
    pub fn from_body(tag: Tag, body: Bytes) -> Result<Self> {
        let packet = match tag {
            Tag::PublicKeyEncryptedSessionKey => {
                PublicKeyEncryptedSessionKey::from_buf(body)?.into()
            }
            Tag::OnePassSignature => OnePassSignature::from_buf(body)?.into(),
            Tag::SecretKey => Packet::SecretKey(SecretKey::from_buf(body)?),
            Tag::SecretSubkey => Packet::SecretSubkey(SecretKey::from_buf(body)?),
            Tag::CompressedData => CompressedData::from_buf(body)?.into(),
            Tag::SymEncryptedData => SymEncryptedData::new(body).into(),
            Tag::LiteralData => LiteralData::from_buf(body)?.into(),
            Tag::SymEncryptedProtectedData => SymEncryptedProtectedData::from_buf(body)?.into(),
            _ => Packet::Other { tag, body },
        };

        Ok(packet)
    }

    pub fn tag(&self) -> Tag {
        match self {
            Packet::PublicKeyEncryptedSessionKey(_) => Tag::PublicKeyEncryptedSessionKey,
            Packet::OnePassSignature(_) => Tag::OnePassSignature,
            Packet::SecretKey(_) => Tag::SecretKey,
            Packet::SecretSubkey(_) => Tag::SecretSubkey,
            Packet::CompressedData(_) => Tag::CompressedData,
            Packet::SymEncryptedData(_) => Tag::SymEncryptedData,
            Packet::LiteralData(_) => Tag::LiteralData,
            Packet::SymEncryptedProtectedData(_) => Tag::SymEncryptedProtectedData,
            Packet::Other { tag, .. } => *tag,
        }
    }
}

macro_rules! impl_from_packet {
    ($($name:ident),+ $(,)?) => {
        $(
            impl From<$name> for Packet {
                fn from(other: $name) -> Packet {
                    Packet::$name(other)
                }
            }
        )+
    };
}

impl_from_packet!(
    PublicKeyEncryptedSessionKey,
    OnePassSignature,
    CompressedData,
    SymEncryptedData,
    LiteralData,
    SymEncryptedProtectedData,
);
