mod compression;
mod key_id;
mod mpi;
mod packet;
mod params;
mod password;
mod pkesk;
mod s2k;

pub use self::{
    compression::CompressionAlgorithm,
    key_id::{Fingerprint, KeyId},
    mpi::Mpi,
    packet::*,
    params::*,
    password::Password,
    pkesk::PkeskBytes,
    s2k::StringToKey,
};
