use block_padding::{Padding, Pkcs7};
use cipher::generic_array::{typenum::U8, GenericArray};
use log::debug;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

use crate::crypto::{
    aes_kw, ecc_curve::ECCCurve, hash::HashAlgorithm, public_key::PublicKeyAlgorithm,
    sym::SymmetricKeyAlgorithm, Decryptor,
};
use crate::errors::{unsupported_err, Error, Result};
use crate::types::Mpi;

/// 20 octets representing "Anonymous Sender    ".
const ANON_SENDER: [u8; 20] = [
    0x41, 0x6E, 0x6F, 0x6E, 0x79, 0x6D, 0x6F, 0x75, 0x73, 0x20, 0x53, 0x65, 0x6E, 0x64, 0x65, 0x72,
    0x20, 0x20, 0x20, 0x20,
];

const SECRET_KEY_LENGTH: usize = 32;

/// Secret key for ECDH with Curve25519, the only curve supported for decryption.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct SecretKey {
    /// The secret scalar, little endian.
    #[debug("..")]
    secret: Zeroizing<[u8; SECRET_KEY_LENGTH]>,
    hash: HashAlgorithm,
    alg_sym: SymmetricKeyAlgorithm,
}

impl SecretKey {
    /// `raw` is the content of the secret MPI, which stores the scalar big endian.
    pub fn try_from_mpi(
        curve: &ECCCurve,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
        raw: &[u8],
    ) -> Result<Self> {
        if curve != &ECCCurve::Curve25519 {
            unsupported_err!("ECDH decryption with {}", curve.name());
        }
        if raw.len() > SECRET_KEY_LENGTH {
            return Err(Error::invalid_packet("invalid ECDH secret key size"));
        }

        let mut secret = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        // reverse into little endian, missing high zero bytes stay zero
        for (dst, src) in secret.iter_mut().zip(raw.iter().rev()) {
            *dst = *src;
        }

        Ok(SecretKey {
            secret,
            hash,
            alg_sym,
        })
    }
}

/// The session key packet values for an ECDH recipient.
#[derive(Debug)]
pub struct EncryptionFields<'a> {
    /// Ephemeral public point, `0x40` prefixed.
    pub public_point: &'a Mpi,
    /// The wrapped, padded session key.
    pub encrypted_session_key: &'a [u8],
    /// Fingerprint of the recipient key.
    pub fingerprint: &'a [u8],
}

impl Decryptor for SecretKey {
    type EncryptionFields<'a> = EncryptionFields<'a>;

    fn decrypt(&self, data: Self::EncryptionFields<'_>) -> Result<Zeroizing<Vec<u8>>> {
        debug!("ECDH decrypt");

        let point = data.public_point.as_bytes();
        if point.len() != 33 || point[0] != 0x40 {
            return Err(Error::session_key("invalid ephemeral public point"));
        }

        let their_public = {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&point[1..]);
            PublicKey::from(arr)
        };
        let our_secret = StaticSecret::from(*self.secret);
        let shared_secret = our_secret.diffie_hellman(&their_public);

        let param = build_ecdh_param(
            ECCCurve::Curve25519.oid(),
            self.alg_sym,
            self.hash,
            data.fingerprint,
        );
        let z = kdf(
            self.hash,
            shared_secret.as_bytes(),
            self.alg_sym.key_size(),
            &param,
        )?;

        let mut decrypted_key_padded = aes_kw::unwrap(&z, data.encrypted_session_key)
            .map_err(|err| Error::session_key(format!("ECDH: {err}")))?;

        // PKCS5 unpadding (PKCS5 is PKCS7 with a blocksize of 8)
        let len = decrypted_key_padded.len();
        let block_size = 8;
        if len == 0 || len % block_size != 0 {
            return Err(Error::session_key(format!("invalid key length {len}")));
        }
        let offset = len - block_size;
        let last_block = GenericArray::<u8, U8>::from_slice(&decrypted_key_padded[offset..]);
        let unpadded_len = offset
            + Pkcs7::unpad(last_block)
                .map_err(|_| Error::session_key("invalid session key padding"))?
                .len();
        decrypted_key_padded.truncate(unpadded_len);

        Ok(decrypted_key_padded)
    }
}

/// Build param for ECDH algorithm (as defined in RFC 6637)
/// <https://tools.ietf.org/html/rfc6637#section-8>
pub fn build_ecdh_param(
    oid: &[u8],
    alg_sym: SymmetricKeyAlgorithm,
    hash: HashAlgorithm,
    fingerprint: &[u8],
) -> Vec<u8> {
    let kdf_params: [u8; 4] = [
        0x03, // length of the following fields
        0x01, // reserved for future extensions
        hash.into(),
        alg_sym.into(),
    ];

    let oid_len = [oid.len() as u8];

    let values: [&[u8]; 6] = [
        &oid_len,
        oid,
        &[u8::from(PublicKeyAlgorithm::ECDH)],
        &kdf_params,
        &ANON_SENDER[..],
        fingerprint,
    ];

    values.concat()
}

/// Key Derivation Function for ECDH (as defined in RFC 6637).
/// <https://tools.ietf.org/html/rfc6637#section-7>
fn kdf(
    hash: HashAlgorithm,
    x: &[u8; 32],
    length: usize,
    param: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let mut hasher = hash.new_hasher()?;
    hasher.update(&[0, 0, 0, 1]);
    hasher.update(x);
    hasher.update(param);

    let mut digest = Zeroizing::new(hasher.finalize().to_vec());
    if digest.len() < length {
        unsupported_err!("{} is too short for a {} byte KEK", hash, length);
    }
    digest.truncate(length);

    Ok(digest)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn param_layout() {
        let fp = [0xAB; 20];
        let param = build_ecdh_param(
            ECCCurve::Curve25519.oid(),
            SymmetricKeyAlgorithm::AES128,
            HashAlgorithm::Sha256,
            &fp,
        );
        assert_eq!(param.len(), 1 + 10 + 1 + 4 + 20 + 20);
        assert_eq!(&param[..11], &hex!("0a 2b060104019755010501"));
        assert_eq!(&param[11..16], &hex!("12 03 01 08 07"));
        assert_eq!(&param[16..36], b"Anonymous Sender    ");
        assert_eq!(&param[36..], &fp);
    }

    #[test]
    fn secret_is_reversed() {
        let raw = hex!("0102030405060708091011121314151617181920212223242526272829303132");
        let key = SecretKey::try_from_mpi(
            &ECCCurve::Curve25519,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::AES128,
            &raw,
        )
        .unwrap();
        assert_eq!(key.secret[0], 0x32);
        assert_eq!(key.secret[31], 0x01);
        assert!(!format!("{key:?}").contains("0102"));
    }

    #[test]
    fn rejects_other_curves() {
        assert!(SecretKey::try_from_mpi(
            &ECCCurve::P256,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::AES128,
            &[1u8; 32],
        )
        .is_err());
    }

    #[test]
    fn rejects_bad_point() {
        let key = SecretKey::try_from_mpi(
            &ECCCurve::Curve25519,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::AES128,
            &[7u8; 32],
        )
        .unwrap();
        let point = Mpi::from_slice(&[0x41; 33]);
        let err = key
            .decrypt(EncryptionFields {
                public_point: &point,
                encrypted_session_key: &[0u8; 40],
                fingerprint: &[0u8; 20],
            })
            .unwrap_err();
        assert!(matches!(err, Error::SessionKeyUnwrapFailed { .. }));
    }
}
