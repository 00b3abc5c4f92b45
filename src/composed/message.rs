use bytes::Bytes;
use log::debug;

use crate::composed::session_key::PlainSessionKey;
use crate::composed::shared::filter_parsed_packet_results;
use crate::config::DecryptOptions;
use crate::errors::{unsupported_err, Error, Result};
use crate::packet::{
    Packet, PacketReader, PublicKeyEncryptedSessionKey, SymEncryptedData,
    SymEncryptedProtectedData,
};
use crate::types::Tag;

/// The encrypted payload of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptedData {
    Protected(SymEncryptedProtectedData),
    Unprotected(SymEncryptedData),
}

impl EncryptedData {
    /// Decrypts the payload, refusing unprotected data unless `allow_unprotected` is set.
    pub fn decrypt(&self, key: &PlainSessionKey, allow_unprotected: bool) -> Result<Bytes> {
        match self {
            EncryptedData::Protected(packet) => key.decrypt_protected(packet),
            EncryptedData::Unprotected(packet) => {
                if !allow_unprotected {
                    return Err(Error::integrity(
                        "encrypted data without integrity protection",
                    ));
                }
                key.decrypt_unprotected(packet)
            }
        }
    }
}

/// The session key packets of a message and the encrypted data following them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedMessage {
    esks: Vec<PublicKeyEncryptedSessionKey>,
    data: EncryptedData,
}

impl EncryptedMessage {
    /// Reads packets up to the first encrypted data packet.
    ///
    /// Framing packets in front of it are skipped, within the bounds of `options`.
    pub fn scan(reader: &mut PacketReader<'_>, options: &DecryptOptions) -> Result<Self> {
        let mut esks = Vec::new();
        let mut skipped = 0;
        let mut depth = 0;

        let data = loop {
            let Some(packet) = reader.next() else {
                debug!("end of message, {} session key packets", esks.len());
                return Err(Error::NoEncryptedData);
            };
            let packet = match filter_parsed_packet_results(packet) {
                Some(packet) => packet?,
                None => {
                    skipped += 1;
                    if skipped > options.get_max_skipped_packets() {
                        return Err(Error::NoEncryptedData);
                    }
                    continue;
                }
            };

            match packet {
                Packet::PublicKeyEncryptedSessionKey(esk) => {
                    debug!("session key packet for {} ({:?})", esk.id(), esk.algorithm());
                    esks.push(esk);
                }
                Packet::SymEncryptedProtectedData(packet) => {
                    break EncryptedData::Protected(packet);
                }
                Packet::SymEncryptedData(packet) => {
                    break EncryptedData::Unprotected(packet);
                }
                Packet::CompressedData(packet) => {
                    depth += 1;
                    if depth > options.get_max_compression_depth() {
                        return Err(Error::invalid_packet("too many compression layers"));
                    }
                    debug!("descending into {:?}", packet.compression_algorithm());
                    reader.replace_source(packet.decompress()?);
                }
                Packet::Other {
                    tag: Tag::GnupgAead,
                    ..
                } => {
                    unsupported_err!("GnuPG OCB encrypted data");
                }
                other => {
                    skipped += 1;
                    debug!("skipping {:?} packet before the encrypted data", other.tag());
                    if skipped > options.get_max_skipped_packets() {
                        return Err(Error::NoEncryptedData);
                    }
                }
            }
        };

        if esks.is_empty() {
            debug!("encrypted data without public key encrypted session keys");
            return Err(Error::NoEncryptedData);
        }

        Ok(EncryptedMessage { esks, data })
    }

    pub fn esks(&self) -> &[PublicKeyEncryptedSessionKey] {
        &self.esks
    }

    pub fn data(&self) -> &EncryptedData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn packet(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![0xC0 | tag, body.len() as u8];
        out.extend_from_slice(body);
        out
    }

    fn rsa_esk(key_id: [u8; 8]) -> Vec<u8> {
        let mut body = vec![3];
        body.extend_from_slice(&key_id);
        body.extend_from_slice(&hex!("01 0009 01ff"));
        packet(1, &body)
    }

    #[test]
    fn collects_session_key_packets() {
        let mut input = packet(10, b"PGP");
        input.extend(rsa_esk([1; 8]));
        input.extend(packet(3, &hex!("04 07 00 02")));
        input.extend(rsa_esk([2; 8]));
        input.extend(packet(18, &hex!("01 aabbcc")));

        let msg = EncryptedMessage::scan(
            &mut PacketReader::new(&input[..]),
            &DecryptOptions::default(),
        )
        .unwrap();
        assert_eq!(msg.esks().len(), 2);
        assert_eq!(msg.esks()[1].id().as_ref(), &[2u8; 8]);
        assert!(matches!(msg.data(), EncryptedData::Protected(_)));
    }

    #[test]
    fn no_session_key_packets() {
        // password only messages carry a symmetric key encrypted session key
        let mut input = packet(3, &hex!("04 07 00 02"));
        input.extend(packet(18, &hex!("01 aabbcc")));
        let err = EncryptedMessage::scan(
            &mut PacketReader::new(&input[..]),
            &DecryptOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoEncryptedData));

        let input = rsa_esk([1; 8]);
        let err = EncryptedMessage::scan(
            &mut PacketReader::new(&input[..]),
            &DecryptOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoEncryptedData));
    }

    #[test]
    fn skipping_is_bounded() {
        let mut input = Vec::new();
        for _ in 0..3 {
            input.extend(packet(13, b"x"));
        }
        input.extend(rsa_esk([1; 8]));
        input.extend(packet(18, &hex!("01 aabbcc")));

        let options = DecryptOptions::default().max_skipped_packets(2);
        let err = EncryptedMessage::scan(&mut PacketReader::new(&input[..]), &options).unwrap_err();
        assert!(matches!(err, Error::NoEncryptedData));

        let options = DecryptOptions::default().max_skipped_packets(3);
        assert!(EncryptedMessage::scan(&mut PacketReader::new(&input[..]), &options).is_ok());
    }

    #[test]
    fn gnupg_ocb_data_is_unsupported() {
        let mut input = rsa_esk([1; 8]);
        input.extend(packet(20, &hex!("01 07 02 10 00112233445566778899aabbccddeeff")));

        let err = EncryptedMessage::scan(
            &mut PacketReader::new(&input[..]),
            &DecryptOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }), "{err:?}");
    }

    #[test]
    fn unprotected_data_is_refused() {
        let data = EncryptedData::Unprotected(SymEncryptedData::new(Bytes::from_static(&[0; 20])));
        let key = PlainSessionKey::new(
            crate::crypto::sym::SymmetricKeyAlgorithm::AES128,
            &[0u8; 16],
        );
        assert!(matches!(
            data.decrypt(&key, false),
            Err(Error::IntegrityCheckFailed { .. })
        ));
        assert!(data.decrypt(&key, true).is_ok());
    }
}
