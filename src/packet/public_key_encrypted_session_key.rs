use bytes::Buf;

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::types::{KeyId, PkeskBytes};

/// Public Key Encrypted Session Key Packet (PKESK)
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-public-key-encrypted-sessio>
///
/// Only version 3 packets are understood, they go together with version 1
/// integrity protected data (or the legacy unprotected data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyEncryptedSessionKey {
    id: KeyId,
    pk_algo: PublicKeyAlgorithm,
    values: PkeskBytes,
}

impl PublicKeyEncryptedSessionKey {
    /// Parses a `PublicKeyEncryptedSessionKey` packet body.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8()?;
        if version != 3 {
            unsupported_err!("PKESK version {}", version);
        }

        let id = KeyId::from(i.read_array::<8>()?);
        let pk_algo = PublicKeyAlgorithm::from(i.read_u8()?);
        let values = PkeskBytes::try_from_buf(pk_algo, &mut i)?;

        Ok(PublicKeyEncryptedSessionKey {
            id,
            pk_algo,
            values,
        })
    }

    /// The key id of the recipient, all zeros if the sender hid it.
    pub fn id(&self) -> &KeyId {
        &self.id
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    pub fn values(&self) -> &PkeskBytes {
        &self.values
    }
}
