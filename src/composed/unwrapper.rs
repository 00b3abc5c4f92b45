use log::debug;

use crate::composed::shared::filter_parsed_packet_results;
use crate::config::DecryptOptions;
use crate::errors::{Error, Result};
use crate::packet::{LiteralData, Packet, PacketReader};

/// Where the walk over the decrypted packets stands.
#[derive(Debug)]
enum State {
    AwaitingNext,
    Found(LiteralData),
}

/// Walks decrypted packets through signature and compression framing down to the literal data.
#[derive(Debug)]
pub struct Unwrapper {
    max_skipped: usize,
    max_depth: usize,
    skipped: usize,
    depth: usize,
}

impl Unwrapper {
    pub fn new(options: &DecryptOptions) -> Self {
        Unwrapper {
            max_skipped: options.get_max_skipped_packets(),
            max_depth: options.get_max_compression_depth(),
            skipped: 0,
            depth: 0,
        }
    }

    /// Returns the first literal data packet.
    pub fn find_literal(mut self, reader: &mut PacketReader<'_>) -> Result<LiteralData> {
        loop {
            let packet = reader.next();
            match self.step(reader, packet)? {
                State::AwaitingNext => {}
                State::Found(literal) => {
                    debug!(
                        "literal data {:?} ({:?}, {} bytes)",
                        String::from_utf8_lossy(literal.file_name()),
                        literal.mode(),
                        literal.data().len()
                    );
                    return Ok(literal);
                }
            }
        }
    }

    fn step(
        &mut self,
        reader: &mut PacketReader<'_>,
        packet: Option<Result<Packet>>,
    ) -> Result<State> {
        let Some(packet) = packet else {
            return Err(Error::NoLiteralData {
                skipped: self.skipped,
            });
        };
        let Some(packet) = filter_parsed_packet_results(packet) else {
            return self.skip();
        };

        match packet? {
            Packet::LiteralData(literal) => Ok(State::Found(literal)),
            Packet::OnePassSignature(ops) => {
                // signatures are not verified
                debug!("discarding one pass signature by {}", ops.key_id());
                Ok(State::AwaitingNext)
            }
            Packet::CompressedData(packet) => {
                self.depth += 1;
                if self.depth > self.max_depth {
                    return Err(Error::invalid_packet("too many compression layers"));
                }
                debug!("descending into {:?}", packet.compression_algorithm());
                reader.replace_source(packet.decompress()?);
                Ok(State::AwaitingNext)
            }
            other => {
                debug!("skipping {:?} packet", other.tag());
                self.skip()
            }
        }
    }

    fn skip(&mut self) -> Result<State> {
        self.skipped += 1;
        if self.skipped > self.max_skipped {
            return Err(Error::NoLiteralData {
                skipped: self.skipped,
            });
        }
        Ok(State::AwaitingNext)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use hex_literal::hex;

    use super::*;

    fn packet(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![0xC0 | tag, body.len() as u8];
        out.extend_from_slice(body);
        out
    }

    fn literal(payload: &[u8]) -> Vec<u8> {
        let mut body = hex!("75 05 612e747874 00000000").to_vec();
        body.extend_from_slice(payload);
        packet(11, &body)
    }

    fn walk(input: &[u8], options: &DecryptOptions) -> Result<LiteralData> {
        Unwrapper::new(options).find_literal(&mut PacketReader::new(input))
    }

    #[test]
    fn signed_and_compressed() {
        let ops = packet(4, &hex!("03 00 08 01 0102030405060708 01"));
        let mut inner = ops.clone();
        inner.extend(literal(b"payload"));
        inner.extend(packet(2, &[4, 0, 1, 8]));

        let mut zlib = ZlibEncoder::new(vec![2u8], Compression::default());
        zlib.write_all(&inner).unwrap();
        let input = packet(8, &zlib.finish().unwrap());

        let lit = walk(&input, &DecryptOptions::default()).unwrap();
        assert_eq!(&lit.data()[..], b"payload");
        assert_eq!(&lit.file_name()[..], b"a.txt");

        // compression is not allowed at all
        let err = walk(&input, &DecryptOptions::default().max_compression_depth(0)).unwrap_err();
        assert!(matches!(err, Error::InvalidPacket { .. }), "{err:?}");
    }

    #[test]
    fn first_literal_wins() {
        let mut input = literal(b"one");
        input.extend(literal(b"two"));
        let lit = walk(&input, &DecryptOptions::default()).unwrap();
        assert_eq!(&lit.data()[..], b"one");
    }

    #[test]
    fn no_literal() {
        let input = packet(2, &[4, 0, 1, 8]);
        let err = walk(&input, &DecryptOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NoLiteralData { skipped: 1 }), "{err:?}");

        let err = walk(&[], &DecryptOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NoLiteralData { skipped: 0 }), "{err:?}");

        let mut input = Vec::new();
        for _ in 0..5 {
            input.extend(packet(2, &[4, 0, 1, 8]));
        }
        input.extend(literal(b"late"));
        let err = walk(&input, &DecryptOptions::default().max_skipped_packets(4)).unwrap_err();
        assert!(matches!(err, Error::NoLiteralData { skipped: 5 }), "{err:?}");
    }
}
