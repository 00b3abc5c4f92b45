use bytes::{Buf, Bytes};
use log::debug;
use sha1::{Digest, Sha1};

use crate::crypto::public_key::PublicKeyAlgorithm;
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::types::{Fingerprint, KeyId, PublicParams, SecretParams};

/// Secret Key or Secret Subkey Packet, version 4.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-secret-key-packet-formats>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKey {
    created_at: u32,
    algorithm: PublicKeyAlgorithm,
    public_params: PublicParams,
    secret_params: SecretParams,
    fingerprint: Fingerprint,
}

impl SecretKey {
    /// Parses a secret key packet body, for both primary keys and subkeys.
    pub fn from_buf(body: Bytes) -> Result<Self> {
        let mut i = body.clone();
        let version = i.read_u8()?;
        if version != 4 {
            unsupported_err!("secret key version {}", version);
        }
        let created_at = i.read_be_u32()?;
        let algorithm = PublicKeyAlgorithm::from(i.read_u8()?);
        let public_params = PublicParams::try_from_buf(algorithm, &mut i)?;

        // everything consumed so far is the public key body
        let public_len = body.len() - i.remaining();
        let fingerprint = fingerprint_v4(&body[..public_len]);

        let secret_params = SecretParams::try_from_buf(algorithm, &mut i)?;
        debug!(
            "secret key {} ({:?}, encrypted: {})",
            fingerprint.key_id(),
            algorithm,
            secret_params.is_encrypted()
        );

        Ok(SecretKey {
            created_at,
            algorithm,
            public_params,
            secret_params,
            fingerprint,
        })
    }

    pub fn created_at(&self) -> u32 {
        self.created_at
    }

    pub fn algorithm(&self) -> PublicKeyAlgorithm {
        self.algorithm
    }

    pub fn public_params(&self) -> &PublicParams {
        &self.public_params
    }

    pub fn secret_params(&self) -> &SecretParams {
        &self.secret_params
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub fn key_id(&self) -> KeyId {
        self.fingerprint.key_id()
    }
}

/// SHA1 over `0x99`, the two octet length and the public key body.
fn fingerprint_v4(public_body: &[u8]) -> Fingerprint {
    let mut h = Sha1::new();
    h.update([0x99]);
    h.update((public_body.len() as u16).to_be_bytes());
    h.update(public_body);

    Fingerprint::new(h.finalize().into())
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::errors::Error;

    #[test]
    fn parse_plain_ecdh() {
        let body = Bytes::from_static(&hex!(
            "04 5f000000 12"
            "0a 2b060104019755010501"
            "0107 40 aabbccddeeff00112233445566778899aabbccddeeff00112233445566778899"
            "03 01 08 07"
            "00 0003 05 0008"
        ));
        let key = SecretKey::from_buf(body.clone()).unwrap();
        assert_eq!(key.algorithm(), PublicKeyAlgorithm::ECDH);
        assert_eq!(key.created_at(), 0x5f000000);
        assert!(!key.secret_params().is_encrypted());

        // public part ends right before the usage octet
        let public = &body[..body.len() - 6];
        assert_eq!(key.fingerprint(), fingerprint_v4(public));
        assert_eq!(key.key_id(), key.fingerprint().key_id());
    }

    #[test]
    fn other_versions_are_unsupported() {
        let err = SecretKey::from_buf(Bytes::from_static(&hex!("03 5f000000 01"))).unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }
}
