use log::debug;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPrivateKey};
use zeroize::Zeroizing;

use crate::crypto::Decryptor;
use crate::errors::{Error, Result};
use crate::types::Mpi;

/// Private key for RSA.
#[derive(Clone, PartialEq, Eq, derive_more::Debug)]
pub struct PrivateKey(#[debug("..")] RsaPrivateKey);

impl PrivateKey {
    /// Builds the key from the public `n`, `e` and the secret `d`, `p`, `q` values.
    ///
    /// `u` is not needed, the CRT values are recomputed from the primes.
    /// The secret values are MPI contents borrowed from the decrypted key material.
    pub fn try_from_mpi(n: &Mpi, e: &Mpi, d: &[u8], p: &[u8], q: &[u8]) -> Result<Self> {
        let key = RsaPrivateKey::from_components(
            BigUint::from_bytes_be(n.as_bytes()),
            BigUint::from_bytes_be(e.as_bytes()),
            BigUint::from_bytes_be(d),
            vec![BigUint::from_bytes_be(p), BigUint::from_bytes_be(q)],
        )
        .map_err(|err| Error::invalid_packet(format!("invalid RSA secret key: {err}")))?;

        Ok(PrivateKey(key))
    }
}

impl Decryptor for PrivateKey {
    type EncryptionFields<'a> = &'a Mpi;

    /// RSA decryption using PKCS1v15 padding.
    fn decrypt(&self, mpi: Self::EncryptionFields<'_>) -> Result<Zeroizing<Vec<u8>>> {
        debug!("RSA decrypt");

        let size = self.0.size();
        let c = mpi.as_bytes();
        if c.len() > size {
            return Err(Error::session_key("RSA ciphertext is larger than the modulus"));
        }

        // restore the leading zeros the MPI encoding dropped
        let mut padded = vec![0u8; size - c.len()];
        padded.extend_from_slice(c);

        let m = self
            .0
            .decrypt(Pkcs1v15Encrypt, &padded)
            .map_err(|err| Error::session_key(format!("RSA: {err}")))?;

        Ok(Zeroizing::new(m))
    }
}
