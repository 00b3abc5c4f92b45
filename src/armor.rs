//! # Armor module
//!
//! Decoding of OpenPGP ASCII armor.
//! Ref: <https://www.rfc-editor.org/rfc/rfc9580.html#name-forming-ascii-armor>

mod reader;

pub use self::reader::*;
