use bytes::Bytes;
use snafu::ResultExt;

use crate::errors::{Error, Result, UnsupportedEncodingSnafu};
use crate::packet::{DataMode, LiteralData};

/// The plaintext of a decrypted message and its literal data metadata.
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct DecryptedMessage {
    #[debug("{} bytes", data.len())]
    data: Bytes,
    mode: DataMode,
    #[debug("{:?}", String::from_utf8_lossy(file_name))]
    file_name: Bytes,
    created: u32,
}

impl DecryptedMessage {
    /// Takes the body of `literal`, failing if it is larger than `max_size`.
    pub fn from_literal(literal: LiteralData, max_size: usize) -> Result<Self> {
        if literal.data().len() > max_size {
            return Err(Error::LiteralTooLarge { limit: max_size });
        }
        let mode = literal.mode();
        let file_name = literal.file_name().clone();
        let created = literal.created();

        Ok(DecryptedMessage {
            data: literal.into_data(),
            mode,
            file_name,
            created,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    /// Informational only, may contain non utf-8 bytes.
    pub fn file_name(&self) -> &[u8] {
        &self.file_name
    }

    pub fn created(&self) -> u32 {
        self.created
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Decodes the plaintext as UTF-8.
    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.data.to_vec()).context(UnsupportedEncodingSnafu)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    fn literal(payload: &[u8]) -> LiteralData {
        let mut body = hex!("62 03 612e62 5f000000").to_vec();
        body.extend_from_slice(payload);
        LiteralData::from_buf(Bytes::from(body)).unwrap()
    }

    #[test]
    fn metadata_and_text() {
        let msg = DecryptedMessage::from_literal(literal("zażółć".as_bytes()), 100).unwrap();
        assert_eq!(msg.mode(), DataMode::Binary);
        assert_eq!(msg.file_name(), b"a.b");
        assert_eq!(msg.created(), 0x5f000000);
        assert_eq!(msg.into_string().unwrap(), "zażółć");
    }

    #[test]
    fn limits_and_encoding() {
        let err = DecryptedMessage::from_literal(literal(&[0u8; 11]), 10).unwrap_err();
        assert!(matches!(err, Error::LiteralTooLarge { limit: 10 }));

        let msg = DecryptedMessage::from_literal(literal(&[0xff, 0xfe]), 10).unwrap();
        assert_eq!(msg.data(), &[0xffu8, 0xfe]);
        let err = msg.into_string().unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding { .. }));
    }
}
