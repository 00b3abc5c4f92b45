use bytes::Bytes;

/// Curves that show up in key material, identified by their OID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ECCCurve {
    Curve25519,
    Ed25519,
    P256,
    P384,
    P521,
    BrainpoolP256r1,
    BrainpoolP384r1,
    BrainpoolP512r1,
    Secp256k1,
    Unknown(Bytes),
}

const KNOWN: [(ECCCurve, &[u8]); 9] = [
    (
        ECCCurve::Curve25519,
        &[0x2B, 0x06, 0x01, 0x04, 0x01, 0x97, 0x55, 0x01, 0x05, 0x01],
    ),
    (
        ECCCurve::Ed25519,
        &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xDA, 0x47, 0x0F, 0x01],
    ),
    (
        ECCCurve::P256,
        &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07],
    ),
    (ECCCurve::P384, &[0x2B, 0x81, 0x04, 0x00, 0x22]),
    (ECCCurve::P521, &[0x2B, 0x81, 0x04, 0x00, 0x23]),
    (
        ECCCurve::BrainpoolP256r1,
        &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x07],
    ),
    (
        ECCCurve::BrainpoolP384r1,
        &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0B],
    ),
    (
        ECCCurve::BrainpoolP512r1,
        &[0x2B, 0x24, 0x03, 0x03, 0x02, 0x08, 0x01, 0x01, 0x0D],
    ),
    (ECCCurve::Secp256k1, &[0x2B, 0x81, 0x04, 0x00, 0x0A]),
];

impl ECCCurve {
    /// Standard name
    pub fn name(&self) -> &str {
        match self {
            ECCCurve::Curve25519 => "Curve25519",
            ECCCurve::Ed25519 => "Ed25519",
            ECCCurve::P256 => "NIST P-256",
            ECCCurve::P384 => "NIST P-384",
            ECCCurve::P521 => "NIST P-521",
            ECCCurve::BrainpoolP256r1 => "brainpoolP256r1",
            ECCCurve::BrainpoolP384r1 => "brainpoolP384r1",
            ECCCurve::BrainpoolP512r1 => "brainpoolP512r1",
            ECCCurve::Secp256k1 => "secp256k1",
            ECCCurve::Unknown(_) => "unknown",
        }
    }

    /// DER encoded OID, without the tag and length octets.
    pub fn oid(&self) -> &[u8] {
        if let ECCCurve::Unknown(oid) = self {
            return oid;
        }
        KNOWN
            .iter()
            .find(|(curve, _)| curve == self)
            .map(|(_, oid)| *oid)
            .unwrap_or(&[])
    }

    /// Get the right curve given an oid.
    pub fn from_oid(oid: &[u8]) -> Self {
        KNOWN
            .iter()
            .find(|(_, known)| *known == oid)
            .map(|(curve, _)| curve.clone())
            .unwrap_or_else(|| ECCCurve::Unknown(Bytes::copy_from_slice(oid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_lookup() {
        let oid = ECCCurve::Curve25519.oid().to_vec();
        assert_eq!(oid.len(), 10);
        assert_eq!(ECCCurve::from_oid(&oid), ECCCurve::Curve25519);
        assert_eq!(ECCCurve::from_oid(ECCCurve::P384.oid()).name(), "NIST P-384");

        let unknown = ECCCurve::from_oid(&[1, 2, 3]);
        assert_eq!(unknown.oid(), &[1, 2, 3]);
        assert_eq!(unknown.name(), "unknown");
    }
}
