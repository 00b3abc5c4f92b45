use bytes::Buf;

use crate::crypto::{
    ecc_curve::ECCCurve, hash::HashAlgorithm, public_key::PublicKeyAlgorithm,
    sym::SymmetricKeyAlgorithm,
};
use crate::errors::{unsupported_err, Error, Result};
use crate::parsing::BufParsing;
use crate::types::Mpi;

/// Represent the public parameters for the different algorithms.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum PublicParams {
    RSA {
        n: Mpi,
        e: Mpi,
    },
    DSA {
        p: Mpi,
        q: Mpi,
        g: Mpi,
        y: Mpi,
    },
    ECDSA {
        curve: ECCCurve,
        p: Mpi,
    },
    ECDH {
        curve: ECCCurve,
        p: Mpi,
        hash: HashAlgorithm,
        alg_sym: SymmetricKeyAlgorithm,
    },
    Elgamal {
        p: Mpi,
        g: Mpi,
        y: Mpi,
    },
    EdDSALegacy {
        curve: ECCCurve,
        q: Mpi,
    },
}

impl PublicParams {
    /// Parses the algorithm specific public fields of a key packet.
    pub fn try_from_buf<B: Buf>(alg: PublicKeyAlgorithm, i: &mut B) -> Result<Self> {
        let params = match alg {
            PublicKeyAlgorithm::RSA | PublicKeyAlgorithm::RSAEncrypt | PublicKeyAlgorithm::RSASign => {
                let n = Mpi::from_buf(i)?;
                let e = Mpi::from_buf(i)?;
                PublicParams::RSA { n, e }
            }
            PublicKeyAlgorithm::DSA => PublicParams::DSA {
                p: Mpi::from_buf(i)?,
                q: Mpi::from_buf(i)?,
                g: Mpi::from_buf(i)?,
                y: Mpi::from_buf(i)?,
            },
            PublicKeyAlgorithm::Elgamal | PublicKeyAlgorithm::ElgamalEncrypt => {
                PublicParams::Elgamal {
                    p: Mpi::from_buf(i)?,
                    g: Mpi::from_buf(i)?,
                    y: Mpi::from_buf(i)?,
                }
            }
            PublicKeyAlgorithm::ECDSA => {
                let curve = read_curve(i)?;
                let p = Mpi::from_buf(i)?;
                PublicParams::ECDSA { curve, p }
            }
            PublicKeyAlgorithm::EdDSALegacy => {
                let curve = read_curve(i)?;
                let q = Mpi::from_buf(i)?;
                PublicParams::EdDSALegacy { curve, q }
            }
            PublicKeyAlgorithm::ECDH => {
                let curve = read_curve(i)?;
                let p = Mpi::from_buf(i)?;

                // KDF parameters
                let len = i.read_u8()?;
                if len < 3 {
                    return Err(Error::invalid_packet(format!(
                        "ECDH KDF parameters of {len} bytes"
                    )));
                }
                let mut kdf = i.read_take(len.into())?;
                let reserved = kdf.read_u8()?;
                if reserved != 1 {
                    unsupported_err!("ECDH KDF parameters version {}", reserved);
                }
                let hash = kdf.read_u8()?.into();
                let alg_sym = kdf.read_u8()?.into();

                PublicParams::ECDH {
                    curve,
                    p,
                    hash,
                    alg_sym,
                }
            }
            PublicKeyAlgorithm::Unknown(alg) => {
                unsupported_err!("public key algorithm {}", alg)
            }
        };

        Ok(params)
    }
}

fn read_curve<B: Buf>(i: &mut B) -> Result<ECCCurve> {
    let len = i.read_u8()?;
    // 0 and 0xFF are reserved for future extensions
    if len == 0 || len == 0xFF {
        return Err(Error::invalid_packet(format!("invalid curve OID length {len}")));
    }
    let oid = i.read_take(len.into())?;

    Ok(ECCCurve::from_oid(&oid))
}
