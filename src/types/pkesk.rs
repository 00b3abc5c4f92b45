use bytes::{Buf, Bytes};

use super::Mpi;
use crate::{crypto::public_key::PublicKeyAlgorithm, errors::Result, parsing::BufParsing};

/// Values comprising a Public Key Encrypted Session Key
#[derive(Clone, derive_more::Debug, Eq, PartialEq)]
pub enum PkeskBytes {
    Rsa {
        mpi: Mpi,
    },
    Ecdh {
        public_point: Mpi,
        #[debug("{}", hex::encode(encrypted_session_key))]
        encrypted_session_key: Bytes,
    },
    Other {
        #[debug("{}", hex::encode(data))]
        data: Bytes,
    },
}

impl PkeskBytes {
    /// Parses the algorithm specific fields of a v3 session key packet.
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<Self> {
        let values = match alg {
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSASign | PublicKeyAlgorithm::RSAEncrypt => {
                let mpi = Mpi::from_buf(i)?;
                PkeskBytes::Rsa { mpi }
            }
            PublicKeyAlgorithm::ECDH => {
                let public_point = Mpi::from_buf(i)?;
                let len = i.read_u8()?;
                let encrypted_session_key = i.read_take(len.into())?;
                PkeskBytes::Ecdh {
                    public_point,
                    encrypted_session_key,
                }
            }
            _ => PkeskBytes::Other { data: i.rest() },
        };

        Ok(values)
    }
}
