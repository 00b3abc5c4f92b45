use bytes::Buf;

use crate::crypto::{hash::HashAlgorithm, public_key::PublicKeyAlgorithm};
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::types::KeyId;

/// One-Pass Signature Packet
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-one-pass-signature-packet-t>
///
/// Signatures are not verified, the packet is only framing around the literal data.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct OnePassSignature {
    typ: u8,
    hash_algorithm: HashAlgorithm,
    pub_algorithm: PublicKeyAlgorithm,
    key_id: KeyId,
    last: u8,
}

impl OnePassSignature {
    /// Parses a version 3 `OnePassSignature` packet body.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8()?;
        if version != 3 {
            unsupported_err!("one pass signature version {}", version);
        }

        Ok(OnePassSignature {
            typ: i.read_u8()?,
            hash_algorithm: i.read_u8()?.into(),
            pub_algorithm: i.read_u8()?.into(),
            key_id: KeyId::from(i.read_array::<8>()?),
            last: i.read_u8()?,
        })
    }

    /// The signature type octet.
    pub fn typ(&self) -> u8 {
        self.typ
    }

    pub fn pub_algorithm(&self) -> PublicKeyAlgorithm {
        self.pub_algorithm
    }

    pub fn key_id(&self) -> &KeyId {
        &self.key_id
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// Nested one pass signatures follow if this is not the last one.
    pub fn is_last(&self) -> bool {
        self.last != 0
    }
}
