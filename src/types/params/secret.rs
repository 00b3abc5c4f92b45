use bytes::Buf;
use log::debug;

use crate::crypto::{checksum, public_key::PublicKeyAlgorithm, sym::SymmetricKeyAlgorithm};
use crate::errors::{unsupported_err, Error, Result};
use crate::parsing::BufParsing;
use crate::types::{EncryptedSecretParams, PlainSecretParams, StringToKey};

/// How the secret key material is stored.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-secret-key-encryption>
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum S2kUsage {
    /// 0: plain material followed by a two octet checksum.
    Unprotected,
    /// 1..=252: the octet is the cipher, the key is the MD5 of the passphrase.
    LegacyCfb(SymmetricKeyAlgorithm),
    /// 253: AEAD protected.
    Aead,
    /// 254: CFB with a SHA1 hash of the plaintext.
    Cfb,
    /// 255: CFB with a two octet checksum of the plaintext.
    MalleableCfb,
}

impl From<u8> for S2kUsage {
    fn from(value: u8) -> Self {
        match value {
            0 => S2kUsage::Unprotected,
            253 => S2kUsage::Aead,
            254 => S2kUsage::Cfb,
            255 => S2kUsage::MalleableCfb,
            alg => S2kUsage::LegacyCfb(alg.into()),
        }
    }
}

/// The possibly encrypted secret fields of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretParams {
    Plain(PlainSecretParams),
    Encrypted(EncryptedSecretParams),
}

impl SecretParams {
    /// Parses everything following the public fields of a v4 secret key packet.
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<Self> {
        let usage = S2kUsage::from(i.read_u8()?);
        debug!("secret key usage {:?}", usage);

        let (sym_alg, s2k) = match usage {
            S2kUsage::Unprotected => {
                let mut data = i.rest();
                if data.len() < 2 {
                    return Err(Error::invalid_packet("missing secret key checksum"));
                }
                let cs = data.split_off(data.len() - 2);
                if !checksum::verify_simple(&cs, &data) {
                    return Err(Error::invalid_packet("invalid secret key checksum"));
                }
                let params = PlainSecretParams::new(&data);
                if !params.is_well_formed(alg) {
                    return Err(Error::invalid_packet("malformed secret key material"));
                }
                return Ok(SecretParams::Plain(params));
            }
            S2kUsage::Aead => unsupported_err!("AEAD protected secret keys"),
            S2kUsage::LegacyCfb(sym_alg) => (
                sym_alg,
                StringToKey::Simple {
                    hash_alg: crate::crypto::hash::HashAlgorithm::Md5,
                },
            ),
            S2kUsage::Cfb | S2kUsage::MalleableCfb => {
                let sym_alg = SymmetricKeyAlgorithm::from(i.read_u8()?);
                let s2k = StringToKey::try_from_buf(i)?;
                (sym_alg, s2k)
            }
        };

        if s2k.is_gnu_dummy() {
            // the rest (if any) is no usable key material
            i.rest();
            return Ok(SecretParams::Encrypted(EncryptedSecretParams::new(
                Default::default(),
                Default::default(),
                sym_alg,
                s2k,
                usage,
            )));
        }

        let bs = sym_alg.block_size();
        if bs == 0 {
            unsupported_err!("secret key encrypted with {:?}", sym_alg);
        }
        let iv = i.read_take(bs)?;
        let data = i.rest();

        Ok(SecretParams::Encrypted(EncryptedSecretParams::new(
            data, iv, sym_alg, s2k, usage,
        )))
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, SecretParams::Encrypted(_))
    }

    /// Whether no usable secret material is present at all (GnuPG stubs).
    pub fn is_dummy(&self) -> bool {
        match self {
            SecretParams::Plain(_) => false,
            SecretParams::Encrypted(k) => k.string_to_key().is_gnu_dummy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use hex_literal::hex;

    use super::*;

    #[test]
    fn usage_octets() {
        assert_eq!(S2kUsage::from(0), S2kUsage::Unprotected);
        assert_eq!(
            S2kUsage::from(7),
            S2kUsage::LegacyCfb(SymmetricKeyAlgorithm::AES128)
        );
        assert_eq!(S2kUsage::from(254), S2kUsage::Cfb);
        assert_eq!(S2kUsage::from(255), S2kUsage::MalleableCfb);
    }

    #[test]
    fn plain_with_checksum() {
        // a single MPI with value 0x05, then the checksum over it
        let mut buf = Bytes::from_static(&hex!("00 0003 05 0008"));
        let params = SecretParams::try_from_buf(PublicKeyAlgorithm::ECDH, &mut buf).unwrap();
        assert!(!params.is_encrypted());

        let mut buf = Bytes::from_static(&hex!("00 0003 05 0009"));
        assert!(SecretParams::try_from_buf(PublicKeyAlgorithm::ECDH, &mut buf).is_err());
    }

    #[test]
    fn gnu_dummy() {
        let mut buf = Bytes::from_static(&hex!("ff 00 65 02 474e55 01"));
        let params = SecretParams::try_from_buf(PublicKeyAlgorithm::RSA, &mut buf).unwrap();
        assert!(params.is_encrypted());
        assert!(params.is_dummy());
    }

    #[test]
    fn encrypted_sha1() {
        let mut buf = Bytes::from_static(&hex!(
            "fe 07 03 02 0102030405060708 60"
            "00112233445566778899aabbccddeeff"
            "deadbeef"
        ));
        let params = SecretParams::try_from_buf(PublicKeyAlgorithm::RSA, &mut buf).unwrap();
        let SecretParams::Encrypted(enc) = params else {
            panic!("expected encrypted params");
        };
        assert_eq!(enc.usage(), S2kUsage::Cfb);
        assert_eq!(enc.encryption_algorithm(), SymmetricKeyAlgorithm::AES128);
        assert_eq!(enc.iv().len(), 16);
        assert_eq!(enc.data(), &hex!("deadbeef"));
        assert!(!enc.string_to_key().is_gnu_dummy());
    }
}
