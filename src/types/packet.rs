use std::io::BufRead;

use num_enum::{FromPrimitive, IntoPrimitive};

use crate::parsing_reader::BufReadParsing;

/// Represents the packet length.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PacketLength {
    Fixed(u32),
    /// Old format only: the packet extends to the end of the input.
    Indeterminate,
    /// New format only: one chunk of a partial body, more length octets follow it.
    Partial(u32),
}

impl PacketLength {
    /// Reads a new format length.
    /// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-packet-length-encoding>
    pub fn try_from_reader<R: BufRead>(mut r: R) -> std::io::Result<Self> {
        let olen = r.read_u8()?;
        let len = match olen {
            // One-Octet Lengths
            0..=191 => PacketLength::Fixed(olen.into()),
            // Two-Octet Lengths
            192..=223 => {
                let a = r.read_u8()?;
                let l = ((olen as u32 - 192) << 8) + 192 + a as u32;
                PacketLength::Fixed(l)
            }
            // Partial Body Lengths
            224..=254 => PacketLength::Partial(1 << (olen as usize & 0x1F)),
            // Five-Octet Lengths
            255 => {
                let len = r.read_be_u32()?;
                PacketLength::Fixed(len)
            }
        };
        Ok(len)
    }

    /// Returns the length in bytes, if it is specified.
    pub fn maybe_len(&self) -> Option<u32> {
        match self {
            Self::Fixed(len) => Some(*len),
            Self::Indeterminate => None,
            Self::Partial(len) => Some(*len),
        }
    }
}

/// Packet Type ID, see <https://www.rfc-editor.org/rfc/rfc9580.html#packet-types>
#[derive(Debug, PartialEq, Eq, Clone, Copy, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[non_exhaustive]
pub enum Tag {
    /// Public-Key Encrypted Session Key Packet
    PublicKeyEncryptedSessionKey = 1,
    /// Signature Packet
    Signature = 2,
    /// Symmetric-Key Encrypted Session Key Packet
    SymKeyEncryptedSessionKey = 3,
    /// One-Pass Signature Packet
    OnePassSignature = 4,
    /// Secret-Key Packet
    SecretKey = 5,
    /// Public-Key Packet
    PublicKey = 6,
    /// Secret-Subkey Packet
    SecretSubkey = 7,
    /// Compressed Data Packet
    CompressedData = 8,
    /// Symmetrically Encrypted Data Packet
    SymEncryptedData = 9,
    /// Marker Packet
    Marker = 10,
    /// Literal Data Packet
    LiteralData = 11,
    /// Trust Packet
    Trust = 12,
    /// User ID Packet
    UserId = 13,
    /// Public-Subkey Packet
    PublicSubkey = 14,
    /// User Attribute Packet
    UserAttribute = 17,
    /// Sym. Encrypted and Integrity Protected Data Packet
    SymEncryptedProtectedData = 18,
    /// Modification Detection Code Packet
    ModDetectionCode = 19,
    /// GnuPG OCB encrypted data
    GnupgAead = 20,
    /// Padding Packet
    Padding = 21,

    #[num_enum(catch_all)]
    Other(u8),
}

impl Tag {
    /// Partial body lengths are only allowed for data carrying packets.
    pub fn allows_partial_length(self) -> bool {
        matches!(
            self,
            Tag::LiteralData
                | Tag::CompressedData
                | Tag::SymEncryptedData
                | Tag::SymEncryptedProtectedData
                | Tag::GnupgAead
        )
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn length_encodings() {
        assert_eq!(
            PacketLength::try_from_reader(&[100u8][..]).unwrap(),
            PacketLength::Fixed(100)
        );
        assert_eq!(
            PacketLength::try_from_reader(&[0xC5u8, 0xFB][..]).unwrap(),
            PacketLength::Fixed(1723)
        );
        assert_eq!(
            PacketLength::try_from_reader(&[0xFFu8, 0x00, 0x01, 0x86, 0xA0][..]).unwrap(),
            PacketLength::Fixed(100_000)
        );
        assert_eq!(
            PacketLength::try_from_reader(&[0xEFu8][..]).unwrap(),
            PacketLength::Partial(32768)
        );
        assert!(PacketLength::try_from_reader(&[0xFFu8, 0x00][..]).is_err());
    }

    #[test]
    fn tags() {
        assert_eq!(Tag::from(18u8), Tag::SymEncryptedProtectedData);
        assert_eq!(Tag::from(60u8), Tag::Other(60));
        assert_eq!(u8::from(Tag::LiteralData), 11);
        assert!(Tag::LiteralData.allows_partial_length());
        assert!(!Tag::PublicKeyEncryptedSessionKey.allows_partial_length());
    }

    proptest! {
        #[test]
        fn two_octet_lengths_roundtrip(len in 192u32..8384) {
            let first = (((len - 192) >> 8) + 192) as u8;
            let second = ((len - 192) & 0xFF) as u8;
            let parsed = PacketLength::try_from_reader(&[first, second][..]).unwrap();
            prop_assert_eq!(parsed, PacketLength::Fixed(len));
        }
    }
}
