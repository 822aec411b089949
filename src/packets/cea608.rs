//! CEA-608 caption packets: the SMPTE 334 VANC form and the digitized
//! "line 21" waveform form.
//!
//! Both carry one character pair per field. The VANC form (DID `0x61`,
//! SDID `0x02`) wraps the pair in a 3-byte payload together with the
//! caption field and line offset. The line-21 form is `Raw`-coded data
//! recovered from a digitized waveform on lines 21/284; waveform
//! synthesis itself belongs to the raster-math layer outside this crate,
//! so the payload here is the already-sliced character pair.

use crate::error::{AncError, MalformedKind, Result};
use crate::packet::{ANALOG_DID, ANALOG_SID, AncPacket, DataCoding};
use crate::packets::{AncDataType, PacketBody};

/// SMPTE 334 DID for SD (CEA-608) closed captions.
pub const CEA608_VANC_DID: u8 = 0x61;
/// SMPTE 334 SDID for SD (CEA-608) closed captions.
pub const CEA608_VANC_SID: u8 = 0x02;
/// Payload size of the VANC form: field/line byte + two characters.
pub const CEA608_VANC_PAYLOAD_SIZE: usize = 3;

/// Frame lines that carry line-21 caption waveforms (field 1 and field 2,
/// 525i SMPTE numbering).
pub const LINE21_LINES: [u16; 2] = [21, 284];

/// The least-significant 7 bits of `value` with bit 7 set or cleared to
/// make odd parity, per CEA-608.
pub fn add_odd_parity(value: u8) -> u8 {
    let v = value & 0x7F;
    if v.count_ones() % 2 == 0 { v | 0x80 } else { v }
}

/// Classify a packet as the SMPTE 334 VANC form of CEA-608.
pub fn recognize_vanc(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == CEA608_VANC_DID
        && packet.sid() == CEA608_VANC_SID
        && packet.dc() == CEA608_VANC_PAYLOAD_SIZE
    {
        AncDataType::Cea608Vanc
    } else {
        AncDataType::Unknown
    }
}

/// Classify a packet as a digitized line-21 caption waveform.
pub fn recognize_line21(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Raw
        && LINE21_LINES.contains(&packet.location().line_number())
    {
        AncDataType::Cea608Line21
    } else {
        AncDataType::Unknown
    }
}

/// Parse the 3-byte VANC payload: field flag in bit 7 and caption line
/// offset in bits 4:0 of the first byte, then the character pair.
pub(crate) fn parse_vanc(packet: &AncPacket) -> Result<PacketBody> {
    let payload = packet.payload();
    if payload.len() < CEA608_VANC_PAYLOAD_SIZE {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    Ok(PacketBody::Cea608Vanc {
        field2: payload[0] & 0x80 != 0,
        cc_line: payload[0] & 0x1F,
        char1: payload[1],
        char2: payload[2],
    })
}

pub(crate) fn generate_vanc(
    field2: bool,
    cc_line: u8,
    char1: u8,
    char2: u8,
    packet: &mut AncPacket,
) -> Result<()> {
    packet.set_did_sid(CEA608_VANC_DID, CEA608_VANC_SID);
    packet.set_data_coding(DataCoding::Digital);
    let b0 = (u8::from(field2) << 7) | (cc_line & 0x1F);
    packet.set_payload(&[b0, char1, char2]);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}

/// Parse a line-21 character pair.
pub(crate) fn parse_line21(packet: &AncPacket) -> Result<PacketBody> {
    let payload = packet.payload();
    if payload.len() < 2 {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    Ok(PacketBody::Cea608Line21 {
        char1: payload[0],
        char2: payload[1],
    })
}

pub(crate) fn generate_line21(char1: u8, char2: u8, packet: &mut AncPacket) -> Result<()> {
    packet.set_did_sid(ANALOG_DID, ANALOG_SID);
    packet.set_data_coding(DataCoding::Raw);
    packet.set_payload(&[char1, char2]);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}

/// Generate the bare pair form (no wrapper byte).
pub(crate) fn generate_base(char1: u8, char2: u8, packet: &mut AncPacket) -> Result<()> {
    packet.set_payload(&[char1, char2]);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}
