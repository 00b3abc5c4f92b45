use std::io::{self, BufRead};

use log::debug;

use crate::errors::{Error, Result};
use crate::parsing_reader::BufReadParsing;
use crate::types::{PacketLength, Tag};

/// Packet header format.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PacketHeaderVersion {
    /// Legacy format, `0b10TTTTLL`.
    Old,
    /// OpenPGP format, `0b11TTTTTT`.
    New,
}

/// Represents a packet header.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-packet-headers>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    version: PacketHeaderVersion,
    tag: Tag,
    length: PacketLength,
}

impl PacketHeader {
    /// Parse a single packet header from the given reader.
    ///
    /// Returns `None` if the input ended cleanly before the header.
    pub fn try_from_reader<R: BufRead>(mut r: R) -> Result<Option<Self>> {
        if !r.has_remaining()? {
            return Ok(None);
        }
        let header = r.read_u8()?;

        let first_two_bits = header & 0b1100_0000;
        let res = match first_two_bits {
            0b1100_0000 => {
                // new starts with 0b11
                let tag = Tag::from(header & 0b0011_1111);
                let length = PacketLength::try_from_reader(&mut r).map_err(truncated)?;
                PacketHeader {
                    version: PacketHeaderVersion::New,
                    tag,
                    length,
                }
            }
            0b1000_0000 => {
                // old starts with 0b10
                let tag = Tag::from((header >> 2) & 0b0000_1111);
                let length = match header & 0b0000_0011 {
                    // One-Octet Lengths
                    0 => PacketLength::Fixed(r.read_u8().map_err(truncated)?.into()),
                    // Two-Octet Lengths
                    1 => PacketLength::Fixed(r.read_be_u16().map_err(truncated)?.into()),
                    // Four-Octet Lengths
                    2 => PacketLength::Fixed(r.read_be_u32().map_err(truncated)?),
                    _ => PacketLength::Indeterminate,
                };
                PacketHeader {
                    version: PacketHeaderVersion::Old,
                    tag,
                    length,
                }
            }
            _ => {
                return Err(Error::invalid_packet(format!(
                    "unknown packet header version {header:#010b}"
                )));
            }
        };
        debug!("packet header {:?}", res);

        Ok(Some(res))
    }

    /// Returns the packet header version.
    pub const fn version(&self) -> PacketHeaderVersion {
        self.version
    }

    /// Returns the packet length.
    pub fn packet_length(&self) -> PacketLength {
        self.length
    }

    /// Returns the packet tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }
}

pub(crate) fn truncated(err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        return Error::truncated(1, 0);
    }
    err.into()
}
