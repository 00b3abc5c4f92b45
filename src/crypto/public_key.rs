use num_enum::{FromPrimitive, IntoPrimitive};

/// Public key algorithm identifiers.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-public-key-algorithms>
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PublicKeyAlgorithm {
    /// RSA (Encrypt and Sign)
    RSA = 1,
    /// DEPRECATED: RSA (Encrypt-Only)
    RSAEncrypt = 2,
    /// DEPRECATED: RSA (Sign-Only)
    RSASign = 3,
    /// Elgamal (Encrypt-Only)
    ElgamalEncrypt = 16,
    /// DSA (Digital Signature Algorithm)
    DSA = 17,
    /// Elliptic Curve: RFC-6637
    ECDH = 18,
    /// ECDSA: RFC-6637
    ECDSA = 19,
    /// DEPRECATED: Elgamal (Encrypt and Sign)
    Elgamal = 20,
    /// EdDSA legacy format
    EdDSALegacy = 22,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl PublicKeyAlgorithm {
    /// Whether a session key packet for `other` could have been produced for a key of this algorithm.
    pub fn is_compatible(self, other: PublicKeyAlgorithm) -> bool {
        let rsa = |alg| {
            matches!(
                alg,
                PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign
            )
        };
        self == other || (rsa(self) && rsa(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility() {
        assert!(PublicKeyAlgorithm::RSA.is_compatible(PublicKeyAlgorithm::RSAEncrypt));
        assert!(PublicKeyAlgorithm::ECDH.is_compatible(PublicKeyAlgorithm::ECDH));
        assert!(!PublicKeyAlgorithm::RSA.is_compatible(PublicKeyAlgorithm::ECDH));
        assert_eq!(PublicKeyAlgorithm::from(42u8), PublicKeyAlgorithm::Unknown(42));
    }
}
