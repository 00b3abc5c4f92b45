use bytes::Buf;
use log::debug;

use crate::armor::{BlockType, Dearmor};
use crate::composed::key_ring::KeyStore;
use crate::composed::literal::DecryptedMessage;
use crate::composed::message::EncryptedMessage;
use crate::composed::session_key::{resolve, select_recipient};
use crate::composed::unwrapper::Unwrapper;
use crate::config::DecryptOptions;
use crate::errors::{Error, Result};
use crate::packet::PacketReader;
use crate::types::Password;

/// The decryption pipeline.
///
/// Holds no state besides its options, one instance may serve any number of decryptions.
#[derive(Debug, Clone, Default)]
pub struct MessageDecryptor {
    options: DecryptOptions,
}

impl MessageDecryptor {
    pub fn new(options: DecryptOptions) -> Self {
        MessageDecryptor { options }
    }

    /// Decrypts an armored message with an armored private key block and returns the text.
    pub fn decrypt(&self, key_block: &str, message: &str, passphrase: &Password) -> Result<String> {
        let keys = KeyStore::from_armor(key_block)?;

        let armored = Dearmor::decode(message)?;
        armored.ensure_type(&[BlockType::Message])?;

        self.decrypt_bytes(&keys, &armored.data, passphrase)?
            .into_string()
    }

    /// Decrypts a binary message.
    pub fn decrypt_bytes(
        &self,
        keys: &KeyStore,
        message: &[u8],
        passphrase: &Password,
    ) -> Result<DecryptedMessage> {
        let mut reader = self.reader(message);
        let msg = EncryptedMessage::scan(&mut reader, &self.options)?;

        let (esk, entry) = select_recipient(keys, msg.esks())?;
        if !entry.algorithm().is_compatible(esk.algorithm()) {
            return Err(Error::session_key(format!(
                "secret key {} ({:?}) can not decrypt a {:?} session key",
                entry.key_id(),
                entry.algorithm(),
                esk.algorithm()
            )));
        }

        let session_key = {
            let repr = entry.unlock(passphrase)?;
            resolve(entry, &repr, esk)?
        };
        let plaintext = msg
            .data()
            .decrypt(&session_key, self.options.get_allow_unprotected())?;
        drop(session_key);
        debug!("decrypted {} bytes", plaintext.len());

        let mut reader = self.reader(plaintext.reader());
        let literal = Unwrapper::new(&self.options).find_literal(&mut reader)?;

        DecryptedMessage::from_literal(literal, self.options.get_max_literal_size())
    }

    fn reader<'a, R: std::io::BufRead + 'a>(&self, source: R) -> PacketReader<'a> {
        PacketReader::new(source)
            .with_max_packet_size(self.options.get_max_packet_size())
            .with_max_literal_size(self.options.get_max_literal_size())
    }
}
