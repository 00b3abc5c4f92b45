use std::io::{self, BufRead};

use bytes::{Bytes, BytesMut};
use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::packet::header::truncated;
use crate::packet::{Packet, PacketHeader};
use crate::parsing_reader::BufReadParsing;
use crate::types::{PacketLength, Tag};

/// The first chunk of a partial body must be at least this long.
const MIN_FIRST_PARTIAL_LEN: u32 = 512;

/// Mode, file name length, file name and date of a literal data packet.
const LITERAL_HEADER_MAX: usize = 1 + 1 + 255 + 4;

pub const DEFAULT_MAX_PACKET_SIZE: usize = 256 * 1024 * 1024;
pub const DEFAULT_MAX_LITERAL_SIZE: usize = 64 * 1024 * 1024;

/// Reads a sequence of packets from a [`BufRead`].
///
/// Framing errors end the iteration. Errors in a packet body are reported
/// wrapped in [`Error::InvalidPacketContent`] and reading continues with the
/// next packet.
#[derive(derive_more::Debug)]
pub struct PacketReader<'a> {
    #[debug("..")]
    source: Box<dyn BufRead + 'a>,
    max_packet_size: usize,
    max_literal_size: usize,
    done: bool,
}

impl<'a> PacketReader<'a> {
    pub fn new<R: BufRead + 'a>(source: R) -> Self {
        PacketReader {
            source: Box::new(source),
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
            done: false,
        }
    }

    pub fn with_max_packet_size(mut self, max_packet_size: usize) -> Self {
        self.max_packet_size = max_packet_size;
        self
    }

    pub fn with_max_literal_size(mut self, max_literal_size: usize) -> Self {
        self.max_literal_size = max_literal_size;
        self
    }

    /// Continues reading from `source`, dropping whatever is left in the current one.
    pub fn replace_source<R: BufRead + 'a>(&mut self, source: R) {
        self.source = Box::new(source);
        self.done = false;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn read_packet(&mut self) -> Result<Option<(Tag, Bytes)>> {
        let Some(header) = PacketHeader::try_from_reader(&mut self.source)? else {
            return Ok(None);
        };
        let tag = header.tag();
        let body = self.read_body(tag, header.packet_length())?;
        debug!("read {:?} packet of {} bytes", tag, body.len());

        Ok(Some((tag, body)))
    }

    fn read_body(&mut self, tag: Tag, length: PacketLength) -> Result<Bytes> {
        let limit = self.limit(tag);
        let mut out = BytesMut::new();

        match length {
            PacketLength::Fixed(len) => {
                let len = len as usize;
                self.check_limit(tag, len, limit)?;
                self.take(len, &mut out)?;
            }
            PacketLength::Indeterminate => {
                if self.source.read_to_end_limited(limit, &mut out)?.is_none() {
                    return Err(self.too_large(tag, limit));
                }
            }
            PacketLength::Partial(first) => {
                if !tag.allows_partial_length() {
                    return Err(Error::invalid_packet(format!(
                        "partial body length for {tag:?} packet"
                    )));
                }
                if first < MIN_FIRST_PARTIAL_LEN {
                    return Err(Error::invalid_packet(format!(
                        "first partial body chunk of {first} bytes"
                    )));
                }

                let mut chunk = first as usize;
                loop {
                    self.check_limit(tag, out.len().saturating_add(chunk), limit)?;
                    self.take(chunk, &mut out)?;

                    match PacketLength::try_from_reader(&mut self.source).map_err(truncated)? {
                        PacketLength::Partial(len) => chunk = len as usize,
                        PacketLength::Fixed(len) => {
                            let len = len as usize;
                            self.check_limit(tag, out.len().saturating_add(len), limit)?;
                            self.take(len, &mut out)?;
                            break;
                        }
                        PacketLength::Indeterminate => {
                            return Err(Error::invalid_packet("indeterminate partial chunk"));
                        }
                    }
                }
            }
        }

        Ok(out.freeze())
    }

    fn take(&mut self, len: usize, out: &mut BytesMut) -> Result<()> {
        let before = out.len();
        match self.source.take_bytes_into(len, out) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                Err(Error::truncated(len, out.len() - before))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn limit(&self, tag: Tag) -> usize {
        match tag {
            Tag::LiteralData => self.max_literal_size.saturating_add(LITERAL_HEADER_MAX),
            _ => self.max_packet_size,
        }
    }

    fn check_limit(&self, tag: Tag, len: usize, limit: usize) -> Result<()> {
        if len > limit {
            return Err(self.too_large(tag, limit));
        }
        Ok(())
    }

    fn too_large(&self, tag: Tag, limit: usize) -> Error {
        match tag {
            Tag::LiteralData => Error::LiteralTooLarge {
                limit: self.max_literal_size,
            },
            _ => Error::invalid_packet(format!("{tag:?} packet exceeds {limit} bytes")),
        }
    }
}

impl Iterator for PacketReader<'_> {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_packet() {
            Ok(Some((tag, body))) => match Packet::from_body(tag, body) {
                Ok(Packet::LiteralData(lit)) if lit.data().len() > self.max_literal_size => {
                    Some(Err(Error::LiteralTooLarge {
                        limit: self.max_literal_size,
                    }))
                }
                Ok(packet) => Some(Ok(packet)),
                Err(err) => {
                    warn!("invalid {:?} packet: {}", tag, err);
                    Some(Err(Error::InvalidPacketContent {
                        source: Box::new(err),
                    }))
                }
            },
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;

    use super::*;

    fn literal(payload: &[u8]) -> Vec<u8> {
        let mut body = vec![b'b', 0, 0, 0, 0, 0];
        body.extend_from_slice(payload);
        body
    }

    #[test]
    fn reads_fixed_and_old_format() {
        // marker packet in old format, literal in new format
        let mut input = hex!("a8 03 504750").to_vec();
        let body = literal(b"hi");
        input.push(0xCB);
        input.push(body.len() as u8);
        input.extend_from_slice(&body);

        let packets: Vec<_> = PacketReader::new(&input[..])
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].tag(), Tag::Marker);
        let Packet::LiteralData(ref lit) = packets[1] else {
            panic!("unexpected {:?}", packets[1]);
        };
        assert_eq!(&lit.data()[..], b"hi");
    }

    #[test]
    fn reads_partial_bodies() {
        let body = literal(&[7u8; 600]);
        let mut input = vec![0xCB, 0xE9]; // partial, 512 bytes
        input.extend_from_slice(&body[..512]);
        input.push(0xE0); // partial, 1 byte
        input.push(body[512]);
        input.push((body.len() - 513) as u8);
        input.extend_from_slice(&body[513..]);

        let mut reader = PacketReader::new(&input[..]);
        let Some(Ok(Packet::LiteralData(lit))) = reader.next() else {
            panic!("expected literal data");
        };
        assert_eq!(&lit.data()[..], &[7u8; 600][..]);
        assert!(reader.next().is_none());
        assert!(reader.is_done());
    }

    #[test]
    fn rejects_short_first_partial_chunk() {
        let input = [0xCBu8, 0xE1, 1, 2];
        let err = PacketReader::new(&input[..]).next().unwrap().unwrap_err();
        assert!(matches!(err, Error::InvalidPacket { .. }), "{err:?}");
    }

    #[test]
    fn rejects_partial_on_session_key_packets() {
        let mut input = vec![0xC1, 0xE9];
        input.extend_from_slice(&[0u8; 512]);
        let err = PacketReader::new(&input[..]).next().unwrap().unwrap_err();
        assert!(matches!(err, Error::InvalidPacket { .. }), "{err:?}");
    }

    #[test]
    fn truncated_body() {
        let input = hex!("cb 0a 62 00 00000000 6869");
        let mut reader = PacketReader::new(&input[..]);
        let err = reader.next().unwrap().unwrap_err();
        assert!(
            matches!(
                err,
                Error::TruncatedPacket {
                    needed: 10,
                    remaining: 8,
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(reader.next().is_none());
    }

    #[test]
    fn literal_limit() {
        let body = literal(&[1u8; 100]);
        let mut input = vec![0xCB, body.len() as u8];
        input.extend_from_slice(&body);

        let err = PacketReader::new(&input[..])
            .with_max_literal_size(10)
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::LiteralTooLarge { limit: 10 }), "{err:?}");

        let mut input = vec![0xAF];
        input.extend_from_slice(&body);
        let err = PacketReader::new(&input[..])
            .with_max_literal_size(10)
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::LiteralTooLarge { .. }), "{err:?}");

        // bodies beyond the framing limit are not buffered at all
        let mut input = vec![0xCB, 0xFF, 0x00, 0x01, 0x00, 0x00];
        input.extend_from_slice(&body);
        let err = PacketReader::new(&input[..])
            .with_max_literal_size(10)
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, Error::LiteralTooLarge { limit: 10 }), "{err:?}");
    }

    #[test]
    fn body_errors_do_not_stop_reading() {
        // one pass signature with version 9, then a literal
        let mut input = hex!("c4 0d 09 00 08 01 0102030405060708 01").to_vec();
        let body = literal(b"ok");
        input.push(0xCB);
        input.push(body.len() as u8);
        input.extend_from_slice(&body);

        let mut reader = PacketReader::new(&input[..]);
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::InvalidPacketContent { .. }), "{err:?}");
        assert!(matches!(reader.next(), Some(Ok(Packet::LiteralData(_)))));
    }

    #[test]
    fn replace_source_continues() {
        let body = literal(b"inner");
        let mut inner = vec![0xCB, body.len() as u8];
        inner.extend_from_slice(&body);

        let mut reader = PacketReader::new(&[0u8; 0][..]);
        assert!(reader.next().is_none());
        reader.replace_source(&inner[..]);
        assert!(matches!(reader.next(), Some(Ok(Packet::LiteralData(_)))));
    }

    proptest! {
        #[test]
        fn arbitrary_input_terminates(input in prop::collection::vec(any::<u8>(), 0..2048)) {
            let reader = PacketReader::new(&input[..]).with_max_packet_size(4096);
            // every item consumes input or ends the iteration
            prop_assert!(reader.count() <= input.len() + 1);
        }
    }
}
