//! Timecode packets: ancillary timecode (ATC, SMPTE ST 12-2) and vertical
//! interval timecode (VITC) from a digitized waveform.
//!
//! ## ATC payload layout (ST 12-2)
//!
//! An ATC packet (DID `0x60`, SDID `0x60`) carries 16 UDWs. Each UDW holds
//! one nibble of the 64-bit ST 12 timecode word in bits 7:4 and one
//! distributed binary bit (DBB) in bit 3:
//!
//! ```text
//! UDW 0..7:   nibbles 0..7,  DBB1 bits 0..7
//! UDW 8..15:  nibbles 8..15, DBB2 bits 0..7
//! ```
//!
//! The 64-bit word packs, low nibble first: frame units, BG1, frame tens +
//! drop/color flags, BG2, second units, BG3, second tens + field flag, BG4,
//! minute units, BG5, minute tens + BGF0, BG6, hour units, BG7, hour tens +
//! BGF1/BGF2, BG8.
//!
//! ## VITC payload layout
//!
//! VITC arrives as `Raw`-coded data on its customary lines (14 / 277). The
//! waveform itself is digitized and sliced by the raster layer outside this
//! crate; the payload here is the sliced bit content: the eight data bytes
//! of the 90-bit VITC word followed by one check byte (XOR of the data
//! bytes).

use crate::error::{AncError, MalformedKind, Result};
use crate::packet::{ANALOG_DID, ANALOG_SID, AncPacket, DataCoding};
use crate::packets::{AncDataType, PacketBody};

/// DID for SMPTE 12-M ancillary timecode.
pub const ATC_DID: u8 = 0x60;
/// SDID for SMPTE 12-M ancillary timecode.
pub const ATC_SID: u8 = 0x60;
/// ATC payload size: 16 UDWs.
pub const ATC_PAYLOAD_SIZE: usize = 16;

/// Frame lines that customarily carry VITC waveforms (field 1 and field 2).
pub const VITC_LINES: [u16; 2] = [14, 277];

/// VITC payload size: eight data bytes plus a check byte.
pub const VITC_PAYLOAD_SIZE: usize = 9;

/// A decoded SMPTE 12 timecode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timecode {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
    pub drop_frame: bool,
    pub color_frame: bool,
    /// Field identification flag (bit 27 of the 64-bit word).
    pub field_flag: bool,
    /// Binary group flags BGF0/BGF1/BGF2.
    pub bgf: [bool; 3],
    /// Binary groups BG1..BG8, one nibble each.
    pub binary_groups: [u8; 8],
    /// Distributed binary bits, group 1 (payload type code).
    pub dbb1: u8,
    /// Distributed binary bits, group 2 (flags).
    pub dbb2: u8,
}

impl Timecode {
    /// The 16 nibbles of the 64-bit ST 12 timecode word, low nibble first.
    fn to_nibbles(self) -> [u8; 16] {
        [
            self.frames % 10,
            self.binary_groups[0] & 0x0F,
            (self.frames / 10)
                | (u8::from(self.drop_frame) << 2)
                | (u8::from(self.color_frame) << 3),
            self.binary_groups[1] & 0x0F,
            self.seconds % 10,
            self.binary_groups[2] & 0x0F,
            (self.seconds / 10) | (u8::from(self.field_flag) << 3),
            self.binary_groups[3] & 0x0F,
            self.minutes % 10,
            self.binary_groups[4] & 0x0F,
            (self.minutes / 10) | (u8::from(self.bgf[0]) << 3),
            self.binary_groups[5] & 0x0F,
            self.hours % 10,
            self.binary_groups[6] & 0x0F,
            (self.hours / 10) | (u8::from(self.bgf[1]) << 2) | (u8::from(self.bgf[2]) << 3),
            self.binary_groups[7] & 0x0F,
        ]
    }

    fn from_nibbles(n: &[u8; 16], dbb1: u8, dbb2: u8) -> Self {
        Self {
            frames: (n[2] & 0x03) * 10 + (n[0] & 0x0F),
            drop_frame: n[2] & 0x04 != 0,
            color_frame: n[2] & 0x08 != 0,
            seconds: (n[6] & 0x07) * 10 + (n[4] & 0x0F),
            field_flag: n[6] & 0x08 != 0,
            minutes: (n[10] & 0x07) * 10 + (n[8] & 0x0F),
            hours: (n[14] & 0x03) * 10 + (n[12] & 0x0F),
            bgf: [n[10] & 0x08 != 0, n[14] & 0x04 != 0, n[14] & 0x08 != 0],
            binary_groups: [n[1], n[3], n[5], n[7], n[9], n[11], n[13], n[15]],
            dbb1,
            dbb2,
        }
    }

    /// The eight data bytes of the VITC word: nibble pairs, low nibble in
    /// bits 3:0.
    fn to_vitc_bytes(self) -> [u8; 8] {
        let n = self.to_nibbles();
        let mut bytes = [0u8; 8];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = n[2 * i] | (n[2 * i + 1] << 4);
        }
        bytes
    }

    fn from_vitc_bytes(bytes: &[u8]) -> Self {
        let mut n = [0u8; 16];
        for (i, b) in bytes.iter().take(8).enumerate() {
            n[2 * i] = b & 0x0F;
            n[2 * i + 1] = b >> 4;
        }
        Self::from_nibbles(&n, 0, 0)
    }
}

impl std::fmt::Display for Timecode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sep = if self.drop_frame { ';' } else { ':' };
        write!(
            f,
            "{:02}:{:02}:{:02}{}{:02}",
            self.hours, self.minutes, self.seconds, sep, self.frames
        )
    }
}

/// Classify a packet as ancillary timecode by its DID/SDID.
pub fn recognize_atc(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == ATC_DID
        && packet.sid() == ATC_SID
    {
        AncDataType::TimecodeAtc
    } else {
        AncDataType::Unknown
    }
}

/// Classify a packet as VITC by its coding and line number.
pub fn recognize_vitc(packet: &AncPacket) -> AncDataType {
    if packet.coding() == DataCoding::Raw
        && VITC_LINES.contains(&packet.location().line_number())
    {
        AncDataType::TimecodeVitc
    } else {
        AncDataType::Unknown
    }
}

pub(crate) fn parse_atc(packet: &AncPacket) -> Result<PacketBody> {
    let payload = packet.payload();
    if payload.len() < ATC_PAYLOAD_SIZE {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    let mut nibbles = [0u8; 16];
    let mut dbb1 = 0u8;
    let mut dbb2 = 0u8;
    for (i, udw) in payload.iter().take(16).enumerate() {
        nibbles[i] = udw >> 4;
        let dbb_bit = (udw >> 3) & 1;
        if i < 8 {
            dbb1 |= dbb_bit << i;
        } else {
            dbb2 |= dbb_bit << (i - 8);
        }
    }
    Ok(PacketBody::TimecodeAtc(Timecode::from_nibbles(
        &nibbles, dbb1, dbb2,
    )))
}

pub(crate) fn generate_atc(tc: &Timecode, packet: &mut AncPacket) -> Result<()> {
    packet.set_did_sid(ATC_DID, ATC_SID);
    packet.set_data_coding(DataCoding::Digital);
    let nibbles = tc.to_nibbles();
    let mut payload = [0u8; ATC_PAYLOAD_SIZE];
    for (i, udw) in payload.iter_mut().enumerate() {
        let dbb_bit = if i < 8 {
            (tc.dbb1 >> i) & 1
        } else {
            (tc.dbb2 >> (i - 8)) & 1
        };
        *udw = (nibbles[i] << 4) | (dbb_bit << 3);
    }
    packet.set_payload(&payload);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}

pub(crate) fn parse_vitc(packet: &AncPacket) -> Result<PacketBody> {
    let payload = packet.payload();
    if payload.len() < VITC_PAYLOAD_SIZE {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    let check = payload[..8].iter().fold(0u8, |acc, b| acc ^ b);
    if check != payload[8] {
        return Err(AncError::Malformed {
            kind: MalformedKind::BadParity,
        });
    }
    Ok(PacketBody::TimecodeVitc(Timecode::from_vitc_bytes(payload)))
}

pub(crate) fn generate_vitc(tc: &Timecode, packet: &mut AncPacket) -> Result<()> {
    packet.set_did_sid(ANALOG_DID, ANALOG_SID);
    packet.set_data_coding(DataCoding::Raw);
    let bytes = tc.to_vitc_bytes();
    let check = bytes.iter().fold(0u8, |acc, b| acc ^ b);
    let mut payload = [0u8; VITC_PAYLOAD_SIZE];
    payload[..8].copy_from_slice(&bytes);
    payload[8] = check;
    packet.set_payload(&payload);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}
