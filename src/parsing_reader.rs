use std::io::{self, BufRead};

use bytes::BytesMut;

pub trait BufReadParsing: BufRead + Sized {
    fn read_u8(&mut self) -> io::Result<u8> {
        let arr = self.read_array::<1>()?;
        Ok(arr[0])
    }

    fn read_be_u16(&mut self) -> io::Result<u16> {
        let arr = self.read_array::<2>()?;

        Ok(u16::from_be_bytes(arr))
    }

    fn read_be_u32(&mut self) -> io::Result<u32> {
        let arr = self.read_array::<4>()?;

        Ok(u32::from_be_bytes(arr))
    }

    /// Returns `false` at a clean end of input.
    fn has_remaining(&mut self) -> io::Result<bool> {
        let has_remaining = !self.fill_buf()?.is_empty();
        Ok(has_remaining)
    }

    fn read_array<const C: usize>(&mut self) -> io::Result<[u8; C]> {
        let mut arr = [0u8; C];
        let mut read = 0;

        while read < arr.len() {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let available = (arr.len() - read).min(buf.len());
            arr[read..read + available].copy_from_slice(&buf[..available]);
            read += available;
            self.consume(available);
        }
        if read != arr.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more data available",
            ));
        }

        Ok(arr)
    }

    /// Appends exactly `size` bytes to `out`.
    ///
    /// On a short read the bytes that were available are still appended and
    /// `UnexpectedEof` is returned.
    fn take_bytes_into(&mut self, size: usize, out: &mut BytesMut) -> io::Result<()> {
        // Do not allocate everything upfront, only as data is actually available
        // to avoid OOM due to buggy sizes.
        out.reserve(size.min(1024));
        let mut read = 0;

        while read < size {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let available = (size - read).min(buf.len());
            out.extend_from_slice(&buf[..available]);
            read += available;
            self.consume(available);
        }

        if read != size {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more data available",
            ));
        }

        Ok(())
    }

    /// Appends everything up to the end of input.
    ///
    /// Returns `None` as soon as more than `limit` bytes are available.
    fn read_to_end_limited(&mut self, limit: usize, out: &mut BytesMut) -> io::Result<Option<usize>> {
        let mut read = 0;
        loop {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                return Ok(Some(read));
            }
            let len = buf.len();
            if read + len > limit {
                return Ok(None);
            }
            out.extend_from_slice(buf);
            read += len;
            self.consume(len);
        }
    }
}

impl<B: BufRead> BufReadParsing for B {}
