use bytes::Bytes;

/// Symmetrically Encrypted Data Packet
/// <https://www.rfc-editor.org/rfc/rfc9580.html#name-symmetrically-encrypted-dat>
///
/// Carries no integrity protection.
#[derive(derive_more::Debug, Clone, PartialEq, Eq)]
pub struct SymEncryptedData {
    #[debug("{} bytes", data.len())]
    data: Bytes,
}

impl SymEncryptedData {
    pub fn new(data: Bytes) -> Self {
        SymEncryptedData { data }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}
