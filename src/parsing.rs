//! Parsing functions to parse packet bodies held in a [Buf].

use bytes::{Buf, Bytes};
use snafu::Snafu;

use crate::errors::Result;

/// Raised when a body holds fewer bytes than a field needs.
#[derive(Debug, Snafu)]
#[snafu(display("needed {}, remaining {}", needed, remaining))]
pub struct RemainingError {
    pub needed: usize,
    pub remaining: usize,
}

pub trait BufParsing: Buf + Sized {
    fn read_u8(&mut self) -> Result<u8> {
        self.ensure_remaining(1)?;
        Ok(self.get_u8())
    }

    fn read_be_u16(&mut self) -> Result<u16> {
        self.ensure_remaining(2)?;
        Ok(self.get_u16())
    }

    fn read_be_u32(&mut self) -> Result<u32> {
        self.ensure_remaining(4)?;
        Ok(self.get_u32())
    }

    fn read_array<const C: usize>(&mut self) -> Result<[u8; C]> {
        self.ensure_remaining(C)?;
        let mut arr = [0u8; C];
        self.copy_to_slice(&mut arr);
        Ok(arr)
    }

    fn read_take(&mut self, size: usize) -> Result<Bytes> {
        self.ensure_remaining(size)?;
        Ok(self.copy_to_bytes(size))
    }

    fn rest(&mut self) -> Bytes {
        let len = self.remaining();
        self.copy_to_bytes(len)
    }

    fn ensure_remaining(&self, size: usize) -> Result<(), RemainingError> {
        if self.remaining() < size {
            return Err(RemainingError {
                needed: size,
                remaining: self.remaining(),
            });
        }

        Ok(())
    }
}

impl<B: Buf> BufParsing for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn reads_big_endian_fields() {
        let mut buf = Bytes::from_static(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(buf.read_u8().unwrap(), 0x01);
        assert_eq!(buf.read_be_u16().unwrap(), 0x0203);
        assert_eq!(buf.read_be_u32().unwrap(), 0x04050607);
        assert!(!buf.has_remaining());
    }

    #[test]
    fn short_input_is_truncated() {
        let mut buf = Bytes::from_static(&[0x01, 0x02]);
        let err = buf.read_take(5).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedPacket {
                needed: 5,
                remaining: 2,
                ..
            }
        ));
        // nothing was consumed
        assert_eq!(buf.remaining(), 2);
        assert_eq!(buf.read_array::<2>().unwrap(), [0x01, 0x02]);
    }
}
