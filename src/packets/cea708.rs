//! CEA-708 (SMPTE 334) HD closed captioning.
//!
//! The packet is a thin container: the Caption Distribution Packet rides
//! opaquely in the payload and is interpreted by caption-layer code outside
//! this crate. Parsing here is a structural check only.

use crate::error::{AncError, MalformedKind, Result};
use crate::packet::{AncPacket, DataCoding};
use crate::packets::{AncDataType, PacketBody};

/// SMPTE 334 DID for HD (CEA-708) closed captions.
pub const CEA708_DID: u8 = 0x61;
/// SMPTE 334 SDID for HD (CEA-708) closed captions.
pub const CEA708_SID: u8 = 0x01;

/// Classify a packet as CEA-708 caption data by its DID/SDID.
pub fn recognize(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == CEA708_DID
        && packet.sid() == CEA708_SID
    {
        AncDataType::Cea708
    } else {
        AncDataType::Unknown
    }
}

pub(crate) fn parse(packet: &AncPacket) -> Result<PacketBody> {
    if packet.is_empty() {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    Ok(PacketBody::Cea708)
}

pub(crate) fn generate(packet: &mut AncPacket) -> Result<()> {
    packet.set_did_sid(CEA708_DID, CEA708_SID);
    packet.set_data_coding(DataCoding::Digital);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_by_did_sid() {
        let mut p = AncPacket::new();
        p.set_did_sid(CEA708_DID, CEA708_SID);
        p.set_payload(&[0x96, 0x69, 0x10]); // CDP header start
        assert_eq!(recognize(&p), AncDataType::Cea708);
        p.set_sid(0x02);
        assert_eq!(recognize(&p), AncDataType::Unknown);
    }

    #[test]
    fn empty_payload_is_not_valid() {
        let mut p = AncPacket::new();
        p.set_did_sid(CEA708_DID, CEA708_SID);
        p.set_kind(AncDataType::Cea708);
        assert!(p.parse_payload().is_err());
        assert!(!p.parsed_valid());
    }

    #[test]
    fn payload_carried_opaquely() {
        let mut p = AncPacket::new();
        p.set_did_sid(CEA708_DID, CEA708_SID);
        p.set_payload(&[0x96, 0x69, 0x58, 0x5F]);
        p.set_kind(AncDataType::Cea708);
        p.parse_payload().unwrap();
        assert!(p.parsed_valid());
        p.generate_payload().unwrap();
        assert_eq!(p.payload(), &[0x96, 0x69, 0x58, 0x5F]);
    }
}
