use std::io::{self, BufRead, BufReader, Read};

use bytes::{buf::Reader, Buf, Bytes};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use log::debug;

use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;
use crate::types::CompressionAlgorithm;

/// Compressed Data Packet
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-compressed-data-packet-type>
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct CompressedData {
    compression_algorithm: CompressionAlgorithm,
    #[debug("{} bytes", compressed_data.len())]
    compressed_data: Bytes,
}

/// Streams the decompressed contents of a [`CompressedData`] packet.
#[derive(derive_more::Debug)]
pub enum Decompressor<R> {
    Uncompressed(#[debug("..")] R),
    Zip(#[debug("..")] DeflateDecoder<R>),
    Zlib(#[debug("..")] ZlibDecoder<R>),
    #[cfg(feature = "bzip2")]
    Bzip2(#[debug("..")] bzip2::read::BzDecoder<R>),
}

impl<R: BufRead> Decompressor<R> {
    pub fn from_reader(alg: CompressionAlgorithm, r: R) -> Result<Self> {
        debug!("decompressing {:?}", alg);
        match alg {
            CompressionAlgorithm::Uncompressed => Ok(Self::Uncompressed(r)),
            CompressionAlgorithm::ZIP => Ok(Self::Zip(DeflateDecoder::new(r))),
            CompressionAlgorithm::ZLIB => Ok(Self::Zlib(ZlibDecoder::new(r))),
            #[cfg(feature = "bzip2")]
            CompressionAlgorithm::BZip2 => Ok(Self::Bzip2(bzip2::read::BzDecoder::new(r))),
            #[cfg(not(feature = "bzip2"))]
            CompressionAlgorithm::BZip2 => {
                unsupported_err!("bzip2 compression")
            }
            CompressionAlgorithm::Private10 | CompressionAlgorithm::Other(_) => {
                unsupported_err!("compression algorithm {:?}", alg)
            }
        }
    }
}

impl<R: BufRead> Read for Decompressor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Uncompressed(ref mut c) => c.read(buf),
            Self::Zip(ref mut c) => c.read(buf),
            Self::Zlib(ref mut c) => c.read(buf),
            #[cfg(feature = "bzip2")]
            Self::Bzip2(ref mut c) => c.read(buf),
        }
    }
}

impl CompressedData {
    /// Parses a `CompressedData` packet body.
    pub fn from_buf<B: Buf>(mut input: B) -> Result<Self> {
        let alg = CompressionAlgorithm::from(input.read_u8()?);
        Ok(CompressedData {
            compression_algorithm: alg,
            compressed_data: input.rest(),
        })
    }

    pub fn compression_algorithm(&self) -> CompressionAlgorithm {
        self.compression_algorithm
    }

    /// Returns a buffered reader over the decompressed packets.
    pub fn decompress(&self) -> Result<BufReader<Decompressor<Reader<Bytes>>>> {
        let dec = Decompressor::from_reader(
            self.compression_algorithm,
            self.compressed_data.clone().reader(),
        )?;
        Ok(BufReader::new(dec))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;

    use super::*;
    use crate::errors::Error;

    fn packet(alg: u8, payload: &[u8]) -> CompressedData {
        let mut body = vec![alg];
        body.extend_from_slice(payload);
        CompressedData::from_buf(Bytes::from(body)).unwrap()
    }

    #[test]
    fn uncompressed() {
        let mut out = Vec::new();
        packet(0, b"plain")
            .decompress()
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn zip_and_zlib() {
        let mut zip = DeflateEncoder::new(Vec::new(), Compression::default());
        zip.write_all(b"deflated data").unwrap();
        let zip = zip.finish().unwrap();

        let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
        zlib.write_all(b"zlib data").unwrap();
        let zlib = zlib.finish().unwrap();

        let mut out = Vec::new();
        packet(1, &zip)
            .decompress()
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"deflated data");

        let mut out = Vec::new();
        let p = packet(2, &zlib);
        assert_eq!(p.compression_algorithm(), CompressionAlgorithm::ZLIB);
        p.decompress().unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"zlib data");
    }

    #[test]
    fn unknown_algorithm() {
        let err = packet(42, b"x").decompress().unwrap_err();
        assert!(matches!(err, Error::Unsupported { .. }));
    }
}
