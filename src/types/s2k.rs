use bytes::Buf;
use log::debug;
use zeroize::Zeroizing;

use crate::crypto::hash::HashAlgorithm;
use crate::errors::{unsupported_err, Result};
use crate::parsing::BufParsing;

/// GnuPG extension: the secret material is not present.
const GNU_DUMMY: u8 = 1;
/// GnuPG extension: the secret material lives on a smartcard.
const GNU_DIVERT_TO_CARD: u8 = 2;

/// String-To-Key methods are used to convert a given password string into a key.
/// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-string-to-key-s2k-specifier>
#[derive(derive_more::Debug, PartialEq, Eq, Clone)]
pub enum StringToKey {
    Simple {
        hash_alg: HashAlgorithm,
    },
    Salted {
        hash_alg: HashAlgorithm,
        #[debug("{}", hex::encode(salt))]
        salt: [u8; 8],
    },
    IteratedAndSalted {
        hash_alg: HashAlgorithm,
        #[debug("{}", hex::encode(salt))]
        salt: [u8; 8],
        count: u8,
    },
    /// GnuPG private extension (type 101), no usable secret material in the packet.
    Gnu { hash_alg: HashAlgorithm, mode: u8 },
    Other {
        typ: u8,
    },
}

impl StringToKey {
    pub fn try_from_buf<B: Buf>(i: &mut B) -> Result<Self> {
        let typ = i.read_u8()?;
        let s2k = match typ {
            0 => StringToKey::Simple {
                hash_alg: i.read_u8()?.into(),
            },
            1 => StringToKey::Salted {
                hash_alg: i.read_u8()?.into(),
                salt: i.read_array::<8>()?,
            },
            3 => StringToKey::IteratedAndSalted {
                hash_alg: i.read_u8()?.into(),
                salt: i.read_array::<8>()?,
                count: i.read_u8()?,
            },
            101 => {
                let hash_alg = i.read_u8()?.into();
                let magic = i.read_array::<3>()?;
                if &magic != b"GNU" {
                    return Ok(StringToKey::Other { typ });
                }
                let mode = i.read_u8()?;
                if mode == GNU_DIVERT_TO_CARD {
                    // card serial number, not needed
                    let len = i.read_u8()?;
                    i.read_take(usize::from(len).min(16))?;
                }
                StringToKey::Gnu { hash_alg, mode }
            }
            _ => StringToKey::Other { typ },
        };

        Ok(s2k)
    }

    /// Converts a coded count into the count.
    /// Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#section-3.7.1.3>
    pub fn decode_count(c: u8) -> usize {
        (16 + (c as usize & 15)) << ((c >> 4) + 6)
    }

    /// Whether this specifier carries no secret material at all.
    pub fn is_gnu_dummy(&self) -> bool {
        matches!(self, StringToKey::Gnu { mode, .. } if *mode == GNU_DUMMY || *mode == GNU_DIVERT_TO_CARD)
    }

    /// Derives a key of `key_size` bytes from the passphrase.
    pub fn derive_key(&self, passphrase: &[u8], key_size: usize) -> Result<Zeroizing<Vec<u8>>> {
        let (hash_alg, salt, count) = match self {
            StringToKey::Simple { hash_alg } => (*hash_alg, None, None),
            StringToKey::Salted { hash_alg, salt } => (*hash_alg, Some(&salt[..]), None),
            StringToKey::IteratedAndSalted {
                hash_alg,
                salt,
                count,
            } => (*hash_alg, Some(&salt[..]), Some(Self::decode_count(*count))),
            StringToKey::Gnu { .. } => {
                unsupported_err!("secret key material is not available (GnuPG stub)")
            }
            StringToKey::Other { typ } => unsupported_err!("s2k type {}", typ),
        };
        debug!("s2k: {:?}, key size {}", hash_alg, key_size);

        let digest_size = hash_alg.digest_size();
        if digest_size == 0 {
            unsupported_err!("hash algorithm {:?} for s2k", hash_alg);
        }

        let mut key = Zeroizing::new(vec![0u8; key_size]);
        let mut data = Zeroizing::new(Vec::with_capacity(8 + passphrase.len()));
        if let Some(salt) = salt {
            data.extend_from_slice(salt);
        }
        data.extend_from_slice(passphrase);

        for (round, chunk) in key.chunks_mut(digest_size).enumerate() {
            let mut hasher = hash_alg.new_hasher()?;
            // each further context is preloaded with one more zero octet
            hasher.update(&vec![0u8; round]);

            match count {
                Some(count) => {
                    // the whole salt and passphrase are hashed even if the count is smaller
                    let count = count.max(data.len());
                    let full = count / data.len();
                    let tail = count % data.len();
                    for _ in 0..full {
                        hasher.update(&data);
                    }
                    hasher.update(&data[..tail]);
                }
                None => hasher.update(&data),
            }

            let digest = Zeroizing::new(hasher.finalize().to_vec());
            let len = chunk.len();
            chunk.copy_from_slice(&digest[..len]);
        }

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use hex_literal::hex;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn decode_counts() {
        assert_eq!(StringToKey::decode_count(96), 65536);
        assert_eq!(StringToKey::decode_count(255), 65011712);
        assert_eq!(StringToKey::decode_count(0), 1024);
    }

    #[test]
    fn parse_iterated() {
        let mut buf = Bytes::from_static(&hex!("03 02 7EDDB74CEE3311F6 60 ff"));
        let s2k = StringToKey::try_from_buf(&mut buf).unwrap();
        assert_eq!(
            s2k,
            StringToKey::IteratedAndSalted {
                hash_alg: HashAlgorithm::Sha1,
                salt: hex!("7EDDB74CEE3311F6"),
                count: 0x60,
            }
        );
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn parse_gnu_dummy() {
        let mut buf = Bytes::from_static(&hex!("65 02 474e55 01"));
        let s2k = StringToKey::try_from_buf(&mut buf).unwrap();
        assert!(s2k.is_gnu_dummy());
        assert!(s2k.derive_key(b"pw", 16).is_err());
    }

    #[test]
    fn simple_md5_matches_digest() {
        // a simple s2k with a key no larger than the digest is just the digest
        use md5::{Digest, Md5};

        let s2k = StringToKey::Simple {
            hash_alg: HashAlgorithm::Md5,
        };
        let key = s2k.derive_key(b"hello", 16).unwrap();
        assert_eq!(&key[..], &Md5::digest(b"hello")[..]);
    }

    #[test]
    fn longer_keys_use_preloaded_contexts() {
        use sha1::{Digest, Sha1};

        let s2k = StringToKey::Salted {
            hash_alg: HashAlgorithm::Sha1,
            salt: [1, 2, 3, 4, 5, 6, 7, 8],
        };
        let key = s2k.derive_key(b"pw", 32).unwrap();

        let mut first = Sha1::new();
        first.update([1, 2, 3, 4, 5, 6, 7, 8]);
        first.update(b"pw");
        let mut second = Sha1::new();
        second.update([0u8]);
        second.update([1, 2, 3, 4, 5, 6, 7, 8]);
        second.update(b"pw");

        assert_eq!(&key[..20], &first.finalize()[..]);
        assert_eq!(&key[20..], &second.finalize()[..12]);
    }

    proptest! {
        #[test]
        fn derived_keys_have_requested_size(pw in "[a-z]{0,40}", size in 1usize..64) {
            let s2k = StringToKey::IteratedAndSalted {
                hash_alg: HashAlgorithm::Sha256,
                salt: [9u8; 8],
                count: 0,
            };
            let a = s2k.derive_key(pw.as_bytes(), size).unwrap();
            let b = s2k.derive_key(pw.as_bytes(), size).unwrap();
            prop_assert_eq!(a.len(), size);
            prop_assert_eq!(&a[..], &b[..]);
        }
    }
}
