//! Classification and construction of typed ancillary packets.
//!
//! [`guess_type`] runs a fixed, ordered chain of per-subtype recognizers
//! and returns the first match; [`create`] builds a packet of a given type,
//! optionally seeded from a template (e.g. a freshly ingested generic
//! packet).

use crate::packet::{ANALOG_DID, ANALOG_SID, AncPacket, DataCoding};
use crate::packets::{AncDataType, cea608, cea708, frame_status, hdr, timecode};

/// The ordered recognizer chain.
///
/// Order matters: DID/SDID ranges can overlap between loosely-specified
/// types, so the first non-`Unknown` answer wins. Do not reorder without
/// auditing every recognizer pair for overlap.
const RECOGNIZERS: &[fn(&AncPacket) -> AncDataType] = &[
    timecode::recognize_atc,
    timecode::recognize_vitc,
    cea708::recognize,
    cea608::recognize_vanc,
    cea608::recognize_line21,
    frame_status::recognize_524d,
    frame_status::recognize_5251,
    hdr::recognize_sdr,
    hdr::recognize_hdr10,
    hdr::recognize_hlg,
];

/// Classify a generic packet by walking the recognizer chain.
///
/// Deterministic and order-stable: the same packet contents always yield
/// the same answer. Returns [`AncDataType::Unknown`] when nothing matches —
/// a valid result, not an error.
pub fn guess_type(packet: &AncPacket) -> AncDataType {
    for recognize in RECOGNIZERS {
        let kind = recognize(packet);
        if kind != AncDataType::Unknown {
            return kind;
        }
    }
    AncDataType::Unknown
}

/// Instantiate a packet of the given type.
///
/// A `template` (typically a just-ingested generic packet) seeds every
/// field; the subtype then forces its own DID/SDID/coding defaults, the way
/// each packet family defines them. `Unknown` yields a plain generic packet.
///
/// Returns `None` for enum values that have no concrete implementation
/// (`Smpte2016_3`, `Smpte352`, `Smpte2051`) — callers must treat this as
/// "no packet", not an error.
pub fn create(kind: AncDataType, template: Option<&AncPacket>) -> Option<AncPacket> {
    let mut packet = template.cloned().unwrap_or_default();
    packet.set_kind(kind);
    match kind {
        AncDataType::Unknown => Some(packet),
        AncDataType::TimecodeAtc => {
            packet.set_did_sid(timecode::ATC_DID, timecode::ATC_SID);
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::TimecodeVitc => {
            packet.set_did_sid(ANALOG_DID, ANALOG_SID);
            packet.set_data_coding(DataCoding::Raw);
            Some(packet)
        }
        AncDataType::Cea708 => {
            packet.set_did_sid(cea708::CEA708_DID, cea708::CEA708_SID);
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::Cea608Vanc => {
            packet.set_did_sid(cea608::CEA608_VANC_DID, cea608::CEA608_VANC_SID);
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::Cea608Line21 => {
            packet.set_did_sid(ANALOG_DID, ANALOG_SID);
            packet.set_data_coding(DataCoding::Raw);
            Some(packet)
        }
        AncDataType::FrameStatusInfo524D => {
            packet.set_did_sid(
                frame_status::FRAME_STATUS_DID,
                frame_status::FRAME_STATUS_524D_SID,
            );
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::FrameStatusInfo5251 => {
            packet.set_did_sid(
                frame_status::FRAME_STATUS_DID,
                frame_status::FRAME_STATUS_5251_SID,
            );
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::HdrSdr | AncDataType::HdrHdr10 | AncDataType::HdrHlg => {
            packet.set_did_sid(hdr::HDR_DID, hdr::HDR_SID);
            packet.set_data_coding(DataCoding::Digital);
            Some(packet)
        }
        AncDataType::Smpte2016_3 | AncDataType::Smpte352 | AncDataType::Smpte2051 => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::DataCoding;

    fn digital_packet(did: u8, sid: u8, payload: &[u8]) -> AncPacket {
        let mut p = AncPacket::new();
        p.set_did_sid(did, sid);
        p.set_payload(payload);
        p
    }

    #[test]
    fn guesses_each_digital_type() {
        assert_eq!(
            guess_type(&digital_packet(0x60, 0x60, &[0u8; 16])),
            AncDataType::TimecodeAtc
        );
        assert_eq!(
            guess_type(&digital_packet(0x61, 0x01, &[0x96, 0x69])),
            AncDataType::Cea708
        );
        assert_eq!(
            guess_type(&digital_packet(0x61, 0x02, &[0x80, 0x41, 0x42])),
            AncDataType::Cea608Vanc
        );
        assert_eq!(
            guess_type(&digital_packet(0x52, 0x4D, &[0x01])),
            AncDataType::FrameStatusInfo524D
        );
        assert_eq!(
            guess_type(&digital_packet(0x52, 0x51, &[0x01])),
            AncDataType::FrameStatusInfo5251
        );
    }

    #[test]
    fn guesses_analog_types_by_line() {
        let mut p = AncPacket::new();
        p.set_data_coding(DataCoding::Raw);
        p.set_payload(&[0u8; 9]);
        p.location_mut().set_line_number(14);
        assert_eq!(guess_type(&p), AncDataType::TimecodeVitc);
        p.location_mut().set_line_number(21);
        assert_eq!(guess_type(&p), AncDataType::Cea608Line21);
        p.location_mut().set_line_number(100);
        assert_eq!(guess_type(&p), AncDataType::Unknown);
    }

    #[test]
    fn unrecognized_is_unknown_not_error() {
        assert_eq!(
            guess_type(&digital_packet(0x12, 0x34, &[1, 2, 3])),
            AncDataType::Unknown
        );
    }

    #[test]
    fn guess_is_deterministic() {
        let p = digital_packet(0x60, 0x60, &[0u8; 16]);
        let first = guess_type(&p);
        for _ in 0..10 {
            assert_eq!(guess_type(&p), first);
        }
    }

    #[test]
    fn create_unknown_yields_generic_clone() {
        let template = digital_packet(0x12, 0x34, &[9, 8, 7]);
        let p = create(AncDataType::Unknown, Some(&template)).unwrap();
        assert_eq!(p.did_sid(), (0x12, 0x34));
        assert_eq!(p.payload(), &[9, 8, 7]);
        assert_eq!(p.kind(), AncDataType::Unknown);
    }

    #[test]
    fn create_forces_subtype_ids() {
        let template = digital_packet(0x00, 0x00, &[0u8; 16]);
        let p = create(AncDataType::TimecodeAtc, Some(&template)).unwrap();
        assert_eq!(p.did_sid(), (0x60, 0x60));
        assert_eq!(p.kind(), AncDataType::TimecodeAtc);
        assert_eq!(p.payload().len(), 16); // template payload kept
    }

    #[test]
    fn create_unimplemented_types_yield_none() {
        assert!(create(AncDataType::Smpte352, None).is_none());
        assert!(create(AncDataType::Smpte2016_3, None).is_none());
        assert!(create(AncDataType::Smpte2051, None).is_none());
    }

    #[test]
    fn create_from_scratch_uses_defaults() {
        let p = create(AncDataType::Cea608Line21, None).unwrap();
        assert_eq!(p.coding(), DataCoding::Raw);
        assert_eq!(p.did_sid(), (0x00, 0x00));
    }
}
