use bytes::{Buf, Bytes};

use crate::errors::Result;
use crate::parsing::BufParsing;

/// Symmetrically Encrypted Integrity Protected Data Packet
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-symmetrically-encrypted-and>
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct SymEncryptedProtectedData {
    version: u8,
    #[debug("{} bytes", data.len())]
    data: Bytes,
}

impl SymEncryptedProtectedData {
    /// Parses a `SymEncryptedProtectedData` packet body.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let version = i.read_u8()?;
        let data = i.rest();

        Ok(SymEncryptedProtectedData { version, data })
    }

    /// 1 for CFB with MDC, 2 for AEAD.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}
