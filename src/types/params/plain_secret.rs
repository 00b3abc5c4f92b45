use zeroize::Zeroizing;

use crate::crypto::{ecdh, public_key::PublicKeyAlgorithm, rsa};
use crate::errors::{unsupported_err, Error, Result};
use crate::types::{Mpi, PublicParams};

/// The cleartext, algorithm specific secret fields of a key, checksum removed.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
#[debug("PlainSecretParams(..)")]
pub struct PlainSecretParams(Zeroizing<Vec<u8>>);

/// A secret key ready to unwrap session keys.
#[derive(Debug)]
pub enum SecretKeyRepr {
    RSA(rsa::PrivateKey),
    ECDH(ecdh::SecretKey),
}

impl PlainSecretParams {
    pub(crate) fn new(data: &[u8]) -> Self {
        PlainSecretParams(Zeroizing::new(data.to_vec()))
    }

    /// Checks that the material is exactly the MPIs the algorithm needs.
    pub fn is_well_formed(&self, alg: PublicKeyAlgorithm) -> bool {
        let count = match alg {
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign => 4,
            PublicKeyAlgorithm::DSA
            | PublicKeyAlgorithm::Elgamal
            | PublicKeyAlgorithm::ElgamalEncrypt
            | PublicKeyAlgorithm::ECDSA
            | PublicKeyAlgorithm::ECDH
            | PublicKeyAlgorithm::EdDSALegacy => 1,
            PublicKeyAlgorithm::Unknown(_) => return false,
        };

        let mut i = &self.0[..];
        for _ in 0..count {
            if Mpi::borrow_from_slice(&mut i).is_err() {
                return false;
            }
        }
        i.is_empty()
    }

    /// Builds the usable secret key for algorithms that can decrypt.
    ///
    /// The secret MPIs are read in place, nothing is copied out of the zeroizing buffer.
    pub fn as_repr(&self, public_params: &PublicParams) -> Result<SecretKeyRepr> {
        let mut i = &self.0[..];
        let repr = match public_params {
            PublicParams::RSA { n, e } => {
                let d = Mpi::borrow_from_slice(&mut i)?;
                let p = Mpi::borrow_from_slice(&mut i)?;
                let q = Mpi::borrow_from_slice(&mut i)?;
                let key = rsa::PrivateKey::try_from_mpi(n, e, d, p, q)?;
                SecretKeyRepr::RSA(key)
            }
            PublicParams::ECDH {
                curve,
                hash,
                alg_sym,
                ..
            } => {
                let secret = Mpi::borrow_from_slice(&mut i)?;
                let key = ecdh::SecretKey::try_from_mpi(curve, *hash, *alg_sym, secret)?;
                SecretKeyRepr::ECDH(key)
            }
            PublicParams::Elgamal { .. } => unsupported_err!("Elgamal decryption"),
            PublicParams::DSA { .. }
            | PublicParams::ECDSA { .. }
            | PublicParams::EdDSALegacy { .. } => {
                return Err(Error::session_key("key algorithm can not decrypt"));
            }
        };

        Ok(repr)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn well_formed() {
        let one = PlainSecretParams::new(&hex!("0003 05"));
        assert!(one.is_well_formed(PublicKeyAlgorithm::ECDH));
        assert!(!one.is_well_formed(PublicKeyAlgorithm::RSA));

        let trailing = PlainSecretParams::new(&hex!("0003 05 00"));
        assert!(!trailing.is_well_formed(PublicKeyAlgorithm::ECDH));
        assert_eq!(format!("{one:?}"), "PlainSecretParams(..)");
    }

    #[test]
    fn ecdh_key_from_material() {
        use crate::crypto::{ecc_curve::ECCCurve, hash::HashAlgorithm, sym::SymmetricKeyAlgorithm};

        let params = PlainSecretParams::new(&hex!("0010 0005"));
        let public = PublicParams::ECDH {
            curve: ECCCurve::Curve25519,
            p: Mpi::from_slice(&[0x40; 33]),
            hash: HashAlgorithm::Sha256,
            alg_sym: SymmetricKeyAlgorithm::AES128,
        };
        let SecretKeyRepr::ECDH(key) = params.as_repr(&public).unwrap() else {
            panic!("expected an ECDH key");
        };
        let expected = ecdh::SecretKey::try_from_mpi(
            &ECCCurve::Curve25519,
            HashAlgorithm::Sha256,
            SymmetricKeyAlgorithm::AES128,
            &[0x05],
        )
        .unwrap();
        assert_eq!(key, expected);

        let truncated = PlainSecretParams::new(&hex!("0010 05"));
        assert!(truncated.as_repr(&public).is_err());
    }

    #[test]
    fn signing_only_keys_can_not_decrypt() {
        let params = PlainSecretParams::new(&hex!("0003 05"));
        let public = PublicParams::EdDSALegacy {
            curve: crate::crypto::ecc_curve::ECCCurve::Ed25519,
            q: Mpi::from_slice(&[0x40; 33]),
        };
        let err = params.as_repr(&public).unwrap_err();
        assert!(matches!(err, Error::SessionKeyUnwrapFailed { .. }));
    }
}
