use log::{debug, warn};

use crate::errors::{Error, Result};
use crate::packet::Packet;
use crate::types::Tag;

/// Drops packets that carry nothing of interest and packets we can not parse, but may ignore.
pub(crate) fn filter_parsed_packet_results(p: Result<Packet>) -> Option<Result<Packet>> {
    match p {
        Ok(Packet::Other {
            tag: tag @ (Tag::Marker | Tag::Padding),
            ..
        }) => {
            debug!("skipping {:?} packet", tag);
            None
        }
        Ok(_) => Some(p),
        Err(e) => {
            if let Error::Unsupported { ref message, .. } = e {
                // "Error::Unsupported" signals parser errors that we can safely ignore
                // (e.g. packets with unsupported versions)
                warn!("skipping unsupported packet: {e:?}");
                debug!("error: {message}");
                return None;
            }
            if let Error::InvalidPacketContent { source } = &e {
                let err: &Error = source; // unbox
                if let Error::Unsupported { message, .. } = err {
                    warn!("skipping unsupported packet: {e:?}");
                    debug!("error: {message}");
                    return None;
                }
            }

            Some(Err(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn skips_marker_and_unsupported() {
        let marker = Packet::Other {
            tag: Tag::Marker,
            body: Bytes::from_static(b"PGP"),
        };
        assert!(filter_parsed_packet_results(Ok(marker)).is_none());

        let unsupported = Error::InvalidPacketContent {
            source: Box::new(Error::Unsupported {
                message: "v6 keys".into(),
            }),
        };
        assert!(filter_parsed_packet_results(Err(unsupported)).is_none());

        let user_id = Packet::Other {
            tag: Tag::UserId,
            body: Bytes::from_static(b"alice"),
        };
        assert!(matches!(
            filter_parsed_packet_results(Ok(user_id)),
            Some(Ok(_))
        ));

        let truncated = Error::truncated(4, 1);
        assert!(matches!(
            filter_parsed_packet_results(Err(truncated)),
            Some(Err(Error::TruncatedPacket { .. }))
        ));
    }
}
