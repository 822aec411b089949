//! Vendor frame-status information packets.
//!
//! Two packet IDs carry frame status flags (such as the active-frame flag):
//! the "524D" variant (DID `0x52`, SDID `0x4D`) and the "5251" variant
//! (DID `0x52`, SDID `0x51`). Both use the same one-byte payload with the
//! active flag in bit 0.

use crate::error::{AncError, MalformedKind, Result};
use crate::packet::{AncPacket, DataCoding};
use crate::packets::{AncDataType, PacketBody};

pub const FRAME_STATUS_DID: u8 = 0x52;
pub const FRAME_STATUS_524D_SID: u8 = 0x4D;
pub const FRAME_STATUS_5251_SID: u8 = 0x51;

pub fn recognize_524d(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == FRAME_STATUS_DID
        && packet.sid() == FRAME_STATUS_524D_SID
    {
        AncDataType::FrameStatusInfo524D
    } else {
        AncDataType::Unknown
    }
}

pub fn recognize_5251(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == FRAME_STATUS_DID
        && packet.sid() == FRAME_STATUS_5251_SID
    {
        AncDataType::FrameStatusInfo5251
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
    Ok(PacketBody::FrameStatus {
        active: packet.payload()[0] & 0x01 != 0,
    })
}

pub(crate) fn generate(active: bool, packet: &mut AncPacket) -> Result<()> {
    let sid = if packet.kind() == AncDataType::FrameStatusInfo5251 {
        FRAME_STATUS_5251_SID
    } else {
        FRAME_STATUS_524D_SID
    };
    packet.set_did_sid(FRAME_STATUS_DID, sid);
    packet.set_data_coding(DataCoding::Digital);
    packet.set_payload(&[u8::from(active)]);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}
