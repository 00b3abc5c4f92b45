use snafu::{Backtrace, Snafu};

use crate::types::KeyId;

pub type Result<T, E = Error> = ::std::result::Result<T, E>;

/// Error types
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("malformed armor: {message}"))]
    MalformedArmor {
        message: String,
        backtrace: Option<Backtrace>,
    },
    #[snafu(display("truncated packet: needed {needed} bytes, {remaining} remaining"))]
    TruncatedPacket {
        needed: usize,
        remaining: usize,
        backtrace: Option<Backtrace>,
    },
    #[snafu(display("invalid packet: {message}"))]
    InvalidPacket { message: String },
    #[snafu(display("invalid packet content: {source}"))]
    InvalidPacketContent { source: Box<Error> },
    #[snafu(display("key block contains no secret key material"))]
    NoKeyMaterial,
    #[snafu(display("secret key {key_id} is protected, a passphrase is required"))]
    PassphraseRequired { key_id: KeyId },
    #[snafu(display("wrong passphrase for secret key {key_id}"))]
    WrongPassphrase { key_id: KeyId },
    #[snafu(display("message contains no public key encrypted data"))]
    NoEncryptedData,
    #[snafu(display("no secret key matches the recipients {recipients:?}"))]
    KeyMismatch { recipients: Vec<KeyId> },
    #[snafu(display("failed to unwrap session key: {message}"))]
    SessionKeyUnwrapFailed { message: String },
    #[snafu(display("integrity check failed: {message}"))]
    IntegrityCheckFailed { message: String },
    #[snafu(display("no literal data found (skipped {skipped} packets)"))]
    NoLiteralData { skipped: usize },
    #[snafu(display("literal data exceeds the limit of {limit} bytes"))]
    LiteralTooLarge { limit: usize },
    #[snafu(display("literal data is not valid UTF-8"))]
    UnsupportedEncoding { source: std::string::FromUtf8Error },
    /// Signals packet versions and algorithms we recognise but do not implement
    #[snafu(display("Unsupported: {message}"))]
    Unsupported { message: String },
    #[snafu(context(false), display("io error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },
    #[snafu(display("invalid key or iv length for the cipher"))]
    CfbInvalidKeyIvLength,
    #[snafu(display("invalid padding"))]
    UnpadError,
    #[snafu(display("{message}"))]
    Message { message: String },
}

/// Flat classification of [`Error`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ErrorKind {
    MalformedArmor,
    Truncated,
    InvalidPacket,
    NoKeyMaterial,
    PassphraseRequired,
    WrongPassphrase,
    NoEncryptedData,
    KeyMismatch,
    SessionKeyUnwrapFailed,
    IntegrityCheckFailed,
    NoLiteralData,
    LiteralTooLarge,
    UnsupportedEncoding,
    Unsupported,
    Io,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedArmor { .. } => ErrorKind::MalformedArmor,
            Error::TruncatedPacket { .. } => ErrorKind::Truncated,
            Error::InvalidPacket { .. } => ErrorKind::InvalidPacket,
            Error::InvalidPacketContent { source } => source.kind(),
            Error::NoKeyMaterial => ErrorKind::NoKeyMaterial,
            Error::PassphraseRequired { .. } => ErrorKind::PassphraseRequired,
            Error::WrongPassphrase { .. } => ErrorKind::WrongPassphrase,
            Error::NoEncryptedData => ErrorKind::NoEncryptedData,
            Error::KeyMismatch { .. } => ErrorKind::KeyMismatch,
            Error::SessionKeyUnwrapFailed { .. } => ErrorKind::SessionKeyUnwrapFailed,
            Error::IntegrityCheckFailed { .. } => ErrorKind::IntegrityCheckFailed,
            Error::NoLiteralData { .. } => ErrorKind::NoLiteralData,
            Error::LiteralTooLarge { .. } => ErrorKind::LiteralTooLarge,
            Error::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
            Error::Io { .. } => ErrorKind::Io,
            Error::CfbInvalidKeyIvLength | Error::UnpadError | Error::Message { .. } => {
                ErrorKind::Other
            }
        }
    }

    pub(crate) fn malformed_armor(message: impl Into<String>) -> Self {
        MalformedArmorSnafu {
            message: message.into(),
        }
        .build()
    }

    pub(crate) fn truncated(needed: usize, remaining: usize) -> Self {
        TruncatedPacketSnafu { needed, remaining }.build()
    }

    pub(crate) fn invalid_packet(message: impl Into<String>) -> Self {
        Error::InvalidPacket {
            message: message.into(),
        }
    }

    pub(crate) fn session_key(message: impl Into<String>) -> Self {
        Error::SessionKeyUnwrapFailed {
            message: message.into(),
        }
    }

    pub(crate) fn integrity(message: impl Into<String>) -> Self {
        Error::IntegrityCheckFailed {
            message: message.into(),
        }
    }
}

impl From<cipher::InvalidLength> for Error {
    fn from(_: cipher::InvalidLength) -> Error {
        Error::CfbInvalidKeyIvLength
    }
}

impl From<block_padding::UnpadError> for Error {
    fn from(_: block_padding::UnpadError) -> Error {
        Error::UnpadError
    }
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::Message { message: err }
    }
}

impl From<crate::parsing::RemainingError> for Error {
    fn from(err: crate::parsing::RemainingError) -> Error {
        Error::truncated(err.needed, err.remaining)
    }
}

#[macro_export]
macro_rules! unsupported_err {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported { message: $e.to_string()})
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($crate::errors::Error::Message { message: $e.to_string() })
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Message { message: format!($fmt, $($arg)+) })
    };
}

#[macro_export]
macro_rules! format_err {
    ($e:expr) => {
        $crate::errors::Error::Message { message: $e.to_string() }
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Message { message: format!($fmt, $($arg)+) }
    };
}

#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr) => ({
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#, left_val, right_val)
                }
            }
        }
    });
    ($left:expr, $right:expr,) => ({
        $crate::ensure_eq!($left, $right)
    });
    ($left:expr, $right:expr, $($arg:tt)+) => ({
        match (&($left), &($right)) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    $crate::bail!(r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`: {}"#, left_val, right_val,
                           format_args!($($arg)+))
                }
            }
        }
    });
}

pub use crate::{bail, ensure_eq, format_err, unsupported_err};
