//! Limits and policy switches of the decryption pipeline.

use crate::packet::{DEFAULT_MAX_LITERAL_SIZE, DEFAULT_MAX_PACKET_SIZE};

/// Options for [`MessageDecryptor`](crate::MessageDecryptor).
///
/// ```
/// use pgp_decrypt::DecryptOptions;
///
/// let options = DecryptOptions::default()
///     .max_literal_size(1024 * 1024)
///     .allow_unprotected(true);
/// assert_eq!(options.get_max_literal_size(), 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptOptions {
    max_literal_size: usize,
    max_packet_size: usize,
    max_skipped_packets: usize,
    max_compression_depth: usize,
    allow_unprotected: bool,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        DecryptOptions {
            max_literal_size: DEFAULT_MAX_LITERAL_SIZE,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
            max_skipped_packets: 32,
            max_compression_depth: 8,
            allow_unprotected: false,
        }
    }
}

impl DecryptOptions {
    /// Maximum size of the returned literal data.
    pub fn max_literal_size(mut self, size: usize) -> Self {
        self.max_literal_size = size;
        self
    }

    /// Maximum body size of any single packet that is buffered.
    pub fn max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size;
        self
    }

    /// How many uninteresting packets are skipped before giving up.
    pub fn max_skipped_packets(mut self, count: usize) -> Self {
        self.max_skipped_packets = count;
        self
    }

    pub fn max_compression_depth(mut self, depth: usize) -> Self {
        self.max_compression_depth = depth;
        self
    }

    /// Allow decrypting Symmetrically Encrypted Data packets, which carry no integrity protection.
    pub fn allow_unprotected(mut self, allow: bool) -> Self {
        self.allow_unprotected = allow;
        self
    }

    pub fn get_max_literal_size(&self) -> usize {
        self.max_literal_size
    }

    pub fn get_max_packet_size(&self) -> usize {
        self.max_packet_size
    }

    pub fn get_max_skipped_packets(&self) -> usize {
        self.max_skipped_packets
    }

    pub fn get_max_compression_depth(&self) -> usize {
        self.max_compression_depth
    }

    pub fn get_allow_unprotected(&self) -> bool {
        self.allow_unprotected
    }
}
