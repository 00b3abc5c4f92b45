use bytes::{Buf, Bytes};
use num_enum::{FromPrimitive, IntoPrimitive};

use crate::errors::Result;
use crate::parsing::BufParsing;

/// Literal Data Packet
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-literal-data-packet-type-id>
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct LiteralData {
    mode: DataMode,
    /// The filename, may contain non utf-8 bytes
    #[debug("{}", hex::encode(file_name))]
    file_name: Bytes,
    created: u32,
    #[debug("{} bytes", data.len())]
    data: Bytes,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DataMode {
    Binary = b'b',
    /// Deprecated
    Text = b't',
    Utf8 = b'u',
    Mime = b'm',

    #[num_enum(catch_all)]
    Other(u8),
}

impl LiteralData {
    /// Parses a `LiteralData` packet body.
    pub fn from_buf<B: Buf>(mut i: B) -> Result<Self> {
        let mode = DataMode::from(i.read_u8()?);
        let name_len = i.read_u8()?;
        let file_name = i.read_take(name_len.into())?;
        let created = i.read_be_u32()?;
        let data = i.rest();

        Ok(LiteralData {
            mode,
            file_name,
            created,
            data,
        })
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn file_name(&self) -> &Bytes {
        &self.file_name
    }

    /// Seconds since the unix epoch, 0 if unset.
    pub fn created(&self) -> u32 {
        self.created
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }
}
