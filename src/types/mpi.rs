use bytes::{Buf, Bytes};

use crate::errors::{Error, Result};
use crate::parsing::BufParsing;

/// Number of bits we accept when reading MPIs.
/// The value is the same as gnupgs.
const MAX_EXTERN_MPI_BITS: u16 = 16384;

/// Represents an owned MPI value, without leading zeros.
///
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-multiprecision-integers>
#[derive(Default, Clone, PartialEq, Eq, derive_more::Debug)]
pub struct Mpi(#[debug("{}", hex::encode(_0))] Bytes);

impl Mpi {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses a length-prefixed MPI from the given buffer.
    pub fn from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let len_bytes = read_len(i)?;
        let n = i.read_take(len_bytes)?;
        let n_stripped = strip_leading_zeros(&n);
        let n_stripped = n.slice_ref(n_stripped);

        Ok(Mpi(n_stripped))
    }

    /// Parses a length-prefixed MPI in place, returning a view into `i`.
    ///
    /// Used for secret material, which must not be copied out of its zeroizing buffer.
    pub fn borrow_from_slice<'a>(i: &mut &'a [u8]) -> Result<&'a [u8]> {
        let len_bytes = read_len(i)?;
        let slice: &'a [u8] = *i;
        slice.ensure_remaining(len_bytes)?;
        let (n, rest) = slice.split_at(len_bytes);
        *i = rest;

        Ok(strip_leading_zeros(n))
    }

    /// Represents the data in `raw` as an Mpi, `raw` is not length-prefixed.
    pub fn from_slice(raw: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(strip_leading_zeros(raw)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Mpi {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Reads the bit count prefix and returns the length of the value in bytes.
fn read_len<B: Buf>(i: &mut B) -> Result<usize> {
    let len_bits = i.read_be_u16()?;

    if len_bits > MAX_EXTERN_MPI_BITS {
        return Err(Error::invalid_packet(format!(
            "mpi of {len_bits} bits is too large"
        )));
    }

    Ok((usize::from(len_bits) + 7) >> 3)
}

#[inline]
fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    bytes
        .iter()
        .position(|b| b != &0)
        .map(|offset| &bytes[offset..])
        .unwrap_or(&[][..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mpi() {
        let mut buf = Bytes::from_static(&[0x00, 0x09, 0x01, 0xFF, 0xAA]);
        let mpi = Mpi::from_buf(&mut buf).unwrap();
        assert_eq!(mpi.as_bytes(), &[0x01, 0xFF]);
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn parse_mpi_strips_zeros() {
        let mut buf = Bytes::from_static(&[0x00, 0x10, 0x00, 0x01]);
        let mpi = Mpi::from_buf(&mut buf).unwrap();
        assert_eq!(mpi.as_bytes(), &[0x01]);
        assert_eq!(Mpi::from_slice(&[0, 0, 5]).as_bytes(), &[5]);
    }

    #[test]
    fn parse_mpi_too_short() {
        let mut buf = Bytes::from_static(&[0x00, 0x20, 0x01]);
        assert!(Mpi::from_buf(&mut buf).is_err());
    }

    #[test]
    fn borrowed_mpi_stays_in_buffer() {
        let buf: [u8; 7] = [0x00, 0x10, 0x00, 0x07, 0x00, 0x02, 0x03];
        let mut i = &buf[..];

        let first = Mpi::borrow_from_slice(&mut i).unwrap();
        assert_eq!(first, &[0x07]);
        assert!(std::ptr::eq(first.as_ptr(), &buf[3]));

        let second = Mpi::borrow_from_slice(&mut i).unwrap();
        assert_eq!(second, &[0x03]);
        assert!(std::ptr::eq(second.as_ptr(), &buf[6]));
        assert!(i.is_empty());

        let mut short = &[0x00, 0x20, 0x01][..];
        assert!(Mpi::borrow_from_slice(&mut short).is_err());
    }
}
