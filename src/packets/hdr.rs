//! HDR static mastering metadata packets.
//!
//! One DID/SDID pair (`0x87/0x01`) carries a 26-byte static metadata
//! payload; the EOTF field in the first byte selects which of the three
//! recognized types the packet is (SDR, HDR10/PQ, or HLG). All multi-byte
//! fields are little-endian `u16`s:
//!
//! ```text
//! 0:      EOTF (bits 2:0) — 0 = SDR, 2 = PQ, 3 = HLG
//! 1:      static metadata descriptor ID
//! 2..13:  display primaries x/y for three primaries (ST 2086, 0.00002 units)
//! 14..17: white point x/y
//! 18..19: max display mastering luminance (cd/m2)
//! 20..21: min display mastering luminance (0.0001 cd/m2)
//! 22..23: maximum content light level (cd/m2)
//! 24..25: maximum frame-average light level (cd/m2)
//! ```

use crate::error::{AncError, MalformedKind, Result};
use crate::packet::{AncPacket, DataCoding};
use crate::packets::{AncDataType, PacketBody};

pub const HDR_DID: u8 = 0x87;
pub const HDR_SID: u8 = 0x01;
/// Payload size of the static metadata block.
pub const HDR_PAYLOAD_SIZE: usize = 26;

/// EOTF code for SDR (traditional gamma).
pub const EOTF_SDR: u8 = 0;
/// EOTF code for the perceptual quantizer (HDR10).
pub const EOTF_PQ: u8 = 2;
/// EOTF code for hybrid log-gamma.
pub const EOTF_HLG: u8 = 3;

/// HDR static mastering metadata (ST 2086 color volume plus content light
/// levels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HdrMetadata {
    pub eotf: u8,
    pub metadata_id: u8,
    /// Display primaries x/y, three primaries, in 0.00002 units.
    pub primaries: [[u16; 2]; 3],
    /// White point x/y, in 0.00002 units.
    pub white_point: [u16; 2],
    /// Max display mastering luminance, cd/m2.
    pub max_mastering_luminance: u16,
    /// Min display mastering luminance, 0.0001 cd/m2.
    pub min_mastering_luminance: u16,
    pub max_content_light_level: u16,
    pub max_frame_average_light_level: u16,
}

fn recognize_with_eotf(packet: &AncPacket, eotf: u8, kind: AncDataType) -> AncDataType {
    if packet.coding() == DataCoding::Digital
        && packet.did() == HDR_DID
        && packet.sid() == HDR_SID
        && packet.dc() >= HDR_PAYLOAD_SIZE
        && packet.payload()[0] & 0x07 == eotf
    {
        kind
    } else {
        AncDataType::Unknown
    }
}

pub fn recognize_sdr(packet: &AncPacket) -> AncDataType {
    recognize_with_eotf(packet, EOTF_SDR, AncDataType::HdrSdr)
}

pub fn recognize_hdr10(packet: &AncPacket) -> AncDataType {
    recognize_with_eotf(packet, EOTF_PQ, AncDataType::HdrHdr10)
}

pub fn recognize_hlg(packet: &AncPacket) -> AncDataType {
    recognize_with_eotf(packet, EOTF_HLG, AncDataType::HdrHlg)
}

pub(crate) fn parse(packet: &AncPacket) -> Result<PacketBody> {
    let p = packet.payload();
    if p.len() < HDR_PAYLOAD_SIZE {
        return Err(AncError::Malformed {
            kind: MalformedKind::PayloadTooShort,
        });
    }
    let u16_at = |i: usize| u16::from_le_bytes([p[i], p[i + 1]]);
    Ok(PacketBody::Hdr(HdrMetadata {
        eotf: p[0] & 0x07,
        metadata_id: p[1],
        primaries: [
            [u16_at(2), u16_at(4)],
            [u16_at(6), u16_at(8)],
            [u16_at(10), u16_at(12)],
        ],
        white_point: [u16_at(14), u16_at(16)],
        max_mastering_luminance: u16_at(18),
        min_mastering_luminance: u16_at(20),
        max_content_light_level: u16_at(22),
        max_frame_average_light_level: u16_at(24),
    }))
}

pub(crate) fn generate(meta: &HdrMetadata, packet: &mut AncPacket) -> Result<()> {
    packet.set_did_sid(HDR_DID, HDR_SID);
    packet.set_data_coding(DataCoding::Digital);
    let mut p = [0u8; HDR_PAYLOAD_SIZE];
    p[0] = meta.eotf & 0x07;
    p[1] = meta.metadata_id;
    let mut put = |i: usize, v: u16| p[i..i + 2].copy_from_slice(&v.to_le_bytes());
    for (n, prim) in meta.primaries.iter().enumerate() {
        put(2 + n * 4, prim[0]);
        put(4 + n * 4, prim[1]);
    }
    put(14, meta.white_point[0]);
    put(16, meta.white_point[1]);
    put(18, meta.max_mastering_luminance);
    put(20, meta.min_mastering_luminance);
    put(22, meta.max_content_light_level);
    put(24, meta.max_frame_average_light_level);
    packet.set_payload(&p);
    let cs = packet.calculate_checksum8();
    packet.set_checksum(cs, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bt2020_pq() -> HdrMetadata {
        HdrMetadata {
            eotf: EOTF_PQ,
            metadata_id: 0,
            primaries: [[34000, 16000], [13250, 34500], [7500, 3000]],
            white_point: [15635, 16450],
            max_mastering_luminance: 1000,
            min_mastering_luminance: 50,
            max_content_light_level: 1000,
            max_frame_average_light_level: 400,
        }
    }

    #[test]
    fn round_trip() {
        let meta = bt2020_pq();
        let mut p = AncPacket::new();
        p.set_kind(AncDataType::HdrHdr10);
        p.set_body(PacketBody::Hdr(meta));
        p.generate_payload().unwrap();
        assert_eq!(p.did_sid(), (HDR_DID, HDR_SID));
        assert_eq!(p.dc(), HDR_PAYLOAD_SIZE);

        p.parse_payload().unwrap();
        assert_eq!(p.body().unwrap(), &PacketBody::Hdr(meta));
    }

    #[test]
    fn eotf_selects_the_type() {
        let mut p = AncPacket::new();
        p.set_kind(AncDataType::HdrHdr10);
        p.set_body(PacketBody::Hdr(bt2020_pq()));
        p.generate_payload().unwrap();
        assert_eq!(recognize_hdr10(&p), AncDataType::HdrHdr10);
        assert_eq!(recognize_sdr(&p), AncDataType::Unknown);
        assert_eq!(recognize_hlg(&p), AncDataType::Unknown);

        let mut meta = bt2020_pq();
        meta.eotf = EOTF_HLG;
        p.set_body(PacketBody::Hdr(meta));
        p.generate_payload().unwrap();
        assert_eq!(recognize_hlg(&p), AncDataType::HdrHlg);
    }

    #[test]
    fn short_payload_fails() {
        let mut p = AncPacket::new();
        p.set_did_sid(HDR_DID, HDR_SID);
        p.set_payload(&[EOTF_PQ; 10]);
        p.set_kind(AncDataType::HdrHdr10);
        assert!(p.parse_payload().is_err());
        assert_eq!(recognize_hdr10(&p), AncDataType::Unknown);
    }

    #[test]
    fn fields_are_little_endian() {
        let mut p = AncPacket::new();
        p.set_kind(AncDataType::HdrHdr10);
        p.set_body(PacketBody::Hdr(bt2020_pq()));
        p.generate_payload().unwrap();
        // max mastering luminance = 1000 = 0x03E8 at offset 18.
        assert_eq!(p.payload()[18], 0xE8);
        assert_eq!(p.payload()[19], 0x03);
    }
}
