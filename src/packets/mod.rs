//! Typed ancillary packet payloads.
//!
//! Each submodule owns one family of packet semantics: a recognizer that
//! classifies a generic [`AncPacket`](crate::AncPacket) by DID/SDID (or, for
//! analog data, by coding and line number), a parser that interprets the
//! payload into a [`PacketBody`], and a generator that produces the payload
//! bytes back. The closed [`PacketBody`] union replaces open-ended
//! inheritance so the recognizer chain in [`crate::factory`] stays
//! exhaustive by construction.
//!
//! | Type | DID/SDID | Module |
//! |------|----------|--------|
//! | ATC timecode (ST 12-2) | `0x60/0x60` | [`timecode`] |
//! | VITC timecode | analog, lines 14/277 | [`timecode`] |
//! | CEA-708 captions (SMPTE 334) | `0x61/0x01` | [`cea708`] |
//! | CEA-608 captions (SMPTE 334 VANC) | `0x61/0x02` | [`cea608`] |
//! | CEA-608 "line 21" captions | analog, lines 21/284 | [`cea608`] |
//! | Frame status | `0x52/0x4D`, `0x52/0x51` | [`frame_status`] |
//! | HDR static metadata | `0x87/0x01` | [`hdr`] |

pub mod cea608;
pub mod cea708;
pub mod frame_status;
pub mod hdr;
pub mod timecode;

use crate::error::Result;
use crate::packet::AncPacket;

pub use hdr::HdrMetadata;
pub use timecode::Timecode;

/// The ancillary data types known to this crate.
///
/// `Unknown` is the universal fallback: data that is valid but not
/// recognized. It is always a legal, non-error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AncDataType {
    #[default]
    Unknown,
    /// SMPTE 2016-3 Aspect Format Description (AFD) metadata.
    Smpte2016_3,
    /// SMPTE 12-M ancillary timecode (formerly "RP-188").
    TimecodeAtc,
    /// SMPTE 12-M vertical interval timecode.
    TimecodeVitc,
    /// CEA-708 (SMPTE 334) HD closed captioning.
    Cea708,
    /// CEA-608 SD closed captioning (SMPTE 334 VANC packet).
    Cea608Vanc,
    /// CEA-608 SD closed captioning ("line 21" waveform).
    Cea608Line21,
    /// SMPTE 352 payload identifier.
    Smpte352,
    /// SMPTE 2051 two-frame marker.
    Smpte2051,
    /// Frame status information ("524D" variant).
    FrameStatusInfo524D,
    /// Frame status information ("5251" variant).
    FrameStatusInfo5251,
    /// HDR static metadata, SDR transfer characteristics.
    HdrSdr,
    /// HDR static metadata, perceptual quantizer (HDR10).
    HdrHdr10,
    /// HDR static metadata, hybrid log-gamma.
    HdrHlg,
}

/// The parsed, typed form of a packet payload.
///
/// Produced by [`AncPacket::parse_payload`] for recognized subtypes;
/// consumed by [`AncPacket::generate_payload`] to rebuild the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketBody {
    /// A bare CEA-608 character pair (base form).
    Cea608 { char1: u8, char2: u8 },
    /// CEA-608 pair wrapped in a SMPTE 334 VANC packet, with the caption
    /// field and line offset from the first payload byte.
    Cea608Vanc {
        field2: bool,
        cc_line: u8,
        char1: u8,
        char2: u8,
    },
    /// CEA-608 pair recovered from a digitized line-21 waveform.
    Cea608Line21 { char1: u8, char2: u8 },
    /// CEA-708 caption data; the CDP is carried opaquely in the payload.
    Cea708,
    /// ST 12-2 ancillary timecode.
    TimecodeAtc(Timecode),
    /// Vertical interval timecode from a digitized waveform.
    TimecodeVitc(Timecode),
    /// Vendor frame-status flags.
    FrameStatus { active: bool },
    /// HDR static mastering metadata.
    Hdr(HdrMetadata),
}

/// Parse `packet`'s payload according to its recognized kind.
///
/// `Ok(None)` means the kind has no typed body (generic/unknown packets);
/// an error means the payload was structurally unsound for its kind.
pub(crate) fn parse_body(packet: &AncPacket) -> Result<Option<PacketBody>> {
    match packet.kind() {
        AncDataType::Cea608Vanc => cea608::parse_vanc(packet).map(Some),
        AncDataType::Cea608Line21 => cea608::parse_line21(packet).map(Some),
        AncDataType::Cea708 => cea708::parse(packet).map(Some),
        AncDataType::TimecodeAtc => timecode::parse_atc(packet).map(Some),
        AncDataType::TimecodeVitc => timecode::parse_vitc(packet).map(Some),
        AncDataType::FrameStatusInfo524D | AncDataType::FrameStatusInfo5251 => {
            frame_status::parse(packet).map(Some)
        }
        AncDataType::HdrSdr | AncDataType::HdrHdr10 | AncDataType::HdrHlg => {
            hdr::parse(packet).map(Some)
        }
        AncDataType::Unknown
        | AncDataType::Smpte2016_3
        | AncDataType::Smpte352
        | AncDataType::Smpte2051 => Ok(None),
    }
}

/// Rebuild `packet`'s payload bytes (and subtype default DID/SDID/coding)
/// from a parsed body.
pub(crate) fn generate_payload(body: &PacketBody, packet: &mut AncPacket) -> Result<()> {
    match body {
        PacketBody::Cea608 { char1, char2 } => cea608::generate_base(*char1, *char2, packet),
        PacketBody::Cea608Vanc {
            field2,
            cc_line,
            char1,
            char2,
        } => cea608::generate_vanc(*field2, *cc_line, *char1, *char2, packet),
        PacketBody::Cea608Line21 { char1, char2 } => {
            cea608::generate_line21(*char1, *char2, packet)
        }
        PacketBody::Cea708 => cea708::generate(packet),
        PacketBody::TimecodeAtc(tc) => timecode::generate_atc(tc, packet),
        PacketBody::TimecodeVitc(tc) => timecode::generate_vitc(tc, packet),
        PacketBody::FrameStatus { active } => frame_status::generate(*active, packet),
        PacketBody::Hdr(meta) => hdr::generate(meta, packet),
    }
}
