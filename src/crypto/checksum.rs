use sha1::{Digest, Sha1};

/// Two octet checksum: sum of all octets mod 65536.
#[inline]
pub fn simple(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |acc, v| acc.wrapping_add(u16::from(*v)))
}

/// Checks a big endian two octet checksum against `data`.
#[inline]
pub fn verify_simple(expected: &[u8], data: &[u8]) -> bool {
    expected.len() == 2 && u16::from_be_bytes([expected[0], expected[1]]) == simple(data)
}

/// SHA1 checksum, first 20 octets.
#[inline]
pub fn verify_sha1(expected: &[u8], data: &[u8]) -> bool {
    expected == &Sha1::digest(data)[..]
}
