use aes_kw::{KekAes128, KekAes192, KekAes256};
use snafu::{ResultExt, Snafu};
use zeroize::Zeroizing;

/// AES key unwrap possible errors.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid key size: {}", size))]
    InvalidKeySize { size: usize },
    #[snafu(display("wrapped key of {} bytes is not a multiple of 8", size))]
    InvalidDataSize { size: usize },
    #[snafu(display("unwrap failed"))]
    Unwrap { source: aes_kw::Error },
}

/// AES Key Unwrap
/// As defined in RFC 3394.
pub fn unwrap(key: &[u8], data: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    if data.len() < 16 || data.len() % 8 != 0 {
        return Err(InvalidDataSizeSnafu { size: data.len() }.build());
    }

    let mut buf = Zeroizing::new(vec![0u8; data.len() - aes_kw::IV_LEN]);
    match key.len() * 8 {
        128 => KekAes128::try_from(key)
            .and_then(|kek| kek.unwrap(data, &mut buf))
            .context(UnwrapSnafu)?,
        192 => KekAes192::try_from(key)
            .and_then(|kek| kek.unwrap(data, &mut buf))
            .context(UnwrapSnafu)?,
        256 => KekAes256::try_from(key)
            .and_then(|kek| kek.unwrap(data, &mut buf))
            .context(UnwrapSnafu)?,
        size => return Err(InvalidKeySizeSnafu { size }.build()),
    }

    Ok(buf)
}
