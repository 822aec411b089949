//! The generic SMPTE-291 ancillary packet and its SDI byte codec.
//!
//! An [`AncPacket`] holds the contents of one SMPTE-291 ancillary packet, or
//! the digitized contents of one "analog" scan line (e.g. line 21 captions).
//! The payload is stored as 8-bit User Data Words; the SMPTE "DC" (data
//! count) is always the payload length and is never stored separately.
//!
//! ## SDI capture stream format ("GUMP")
//!
//! Capture/playout hardware exchanges packets as a raw byte stream, one
//! packet laid out as:
//!
//! ```text
//! 0:        0xFF            marker, always FF
//! 1:        location byte 1 b7 = location valid (always 1 on playout)
//!                           b6 = raw/analog coding (0 = digital)
//!                           b5 = luma channel (0 = chroma)
//!                           b4 = HANC (0 = VANC)
//!                           b3:0 = line number bits [10:7]
//! 2:        location byte 2 b6:0 = line number bits [6:0]
//! 3:        DID
//! 4:        SDID
//! 5:        DC              payload byte count (0-255)
//! 6..6+DC:  payload
//! 6+DC:     checksum        8-bit sum of DID + SDID + DC + payload
//! ```
//!
//! This is the layout produced by the extractor hardware and is *not* the
//! same as the 10-bit SMPTE-291 representation embedded in a raster line
//! (see [`generate_vanc_words`](AncPacket::generate_vanc_words)).
//!
//! This type is **not thread-safe**: callers must serialize access to a
//! single instance externally.

use std::fmt;

use crate::error::{AncError, MalformedKind, Result};
use crate::location::{DataChannel, DataLink, DataSpace, DataStream, PacketLocation};
use crate::packets::{self, AncDataType, PacketBody};
use crate::rtp::{AncPacketHeader, BitReader, BitWriter};

/// DID used when building "analog" packets in software.
///
/// There is no guarantee extractor hardware uses this code, nor does the
/// inserter care. To determine whether a packet is analog or digital, check
/// the coding flag in the packet header, not the DID.
pub const ANALOG_DID: u8 = 0x00;
/// SDID used when building "analog" packets in software.
pub const ANALOG_SID: u8 = 0x00;

/// Everything in a GUMP packet except the payload:
/// 3 header bytes + DID + SDID + DC + checksum.
pub(crate) const GUMP_WRAPPER_SIZE: usize = 7;

/// Largest payload one GUMP packet can carry (DC is a single byte).
const GUMP_MAX_PAYLOAD: usize = 255;

/// The ancillary data coding type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataCoding {
    /// A structured SMPTE-291 ancillary packet.
    #[default]
    Digital,
    /// A digitized waveform (e.g. CEA-608 line 21 captions, VITC).
    Raw,
}

/// One SMPTE-291 ancillary packet (or one digitized analog line).
///
/// Default-constructed packets are digital, located on link A / DS1 / luma /
/// VANC at line 0. Populate either via an ingest path
/// ([`init_from_received_bytes`](Self::init_from_received_bytes),
/// [`init_from_rtp_words`](Self::init_from_rtp_words)) or via the field
/// setters followed by [`generate_payload`](Self::generate_payload).
#[derive(Debug, Clone)]
pub struct AncPacket {
    did: u8,
    sid: u8,
    checksum: u8,
    location: PacketLocation,
    coding: DataCoding,
    payload: Vec<u8>,
    parsed_valid: bool,
    kind: AncDataType,
    body: Option<PacketBody>,
}

impl Default for AncPacket {
    fn default() -> Self {
        Self {
            did: 0,
            sid: 0,
            checksum: 0,
            location: PacketLocation::new(
                DataLink::A,
                DataStream::DS1,
                DataChannel::Y,
                DataSpace::Vanc,
                0,
                crate::location::HORIZ_OFFSET_DEFAULT,
            ),
            coding: DataCoding::Digital,
            payload: Vec::new(),
            parsed_valid: false,
            kind: AncDataType::Unknown,
            body: None,
        }
    }
}

impl AncPacket {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Inquiry ---

    pub fn did(&self) -> u8 {
        self.did
    }

    pub fn sid(&self) -> u8 {
        self.sid
    }

    /// DID and SDID as a pair, typically used as an indexing key.
    pub fn did_sid(&self) -> (u8, u8) {
        (self.did, self.sid)
    }

    /// Payload data count, in bytes.
    pub fn dc(&self) -> usize {
        self.payload.len()
    }

    /// The stored 8-bit checksum (not recomputed; see
    /// [`calculate_checksum8`](Self::calculate_checksum8)).
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    pub fn location(&self) -> &PacketLocation {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut PacketLocation {
        &mut self.location
    }

    pub fn coding(&self) -> DataCoding {
        self.coding
    }

    pub fn is_digital(&self) -> bool {
        self.coding == DataCoding::Digital
    }

    pub fn is_raw(&self) -> bool {
        self.coding == DataCoding::Raw
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload byte at `index`, or zero if out of range.
    pub fn payload_byte_at(&self, index: usize) -> u8 {
        self.payload.get(index).copied().unwrap_or(0)
    }

    /// The recognized data type, if classification has run.
    pub fn kind(&self) -> AncDataType {
        self.kind
    }

    /// The parsed, typed payload, if [`parse_payload`](Self::parse_payload)
    /// succeeded for a recognized subtype.
    pub fn body(&self) -> Option<&PacketBody> {
        self.body.as_ref()
    }

    /// Soft validity signal set by [`parse_payload`](Self::parse_payload):
    /// true when the subtype recognized the payload as structurally sound.
    pub fn parsed_valid(&self) -> bool {
        self.parsed_valid
    }

    // --- Modification ---

    pub fn set_did(&mut self, did: u8) -> &mut Self {
        self.did = did;
        self
    }

    pub fn set_sid(&mut self, sid: u8) -> &mut Self {
        self.sid = sid;
        self
    }

    pub fn set_did_sid(&mut self, did: u8, sid: u8) -> &mut Self {
        self.did = did;
        self.sid = sid;
        self
    }

    /// Store an 8-bit checksum.
    ///
    /// It is not usually necessary to set one: inserter hardware ignores
    /// this field and computes its own 9-bit SMPTE-291 checksum on playout.
    /// With `validate`, fails with [`AncError::ChecksumMismatch`] unless the
    /// supplied value equals the freshly computed checksum.
    pub fn set_checksum(&mut self, checksum: u8, validate: bool) -> Result<()> {
        if validate {
            let computed = self.calculate_checksum8();
            if checksum != computed {
                return Err(AncError::ChecksumMismatch {
                    stored: u16::from(checksum),
                    computed: u16::from(computed),
                });
            }
        }
        self.checksum = checksum;
        Ok(())
    }

    pub fn set_location(&mut self, location: PacketLocation) -> &mut Self {
        self.location = location;
        self
    }

    pub fn set_data_coding(&mut self, coding: DataCoding) -> &mut Self {
        self.coding = coding;
        self
    }

    /// Set the recognized data type. Usually assigned by
    /// [`crate::factory::create`]; exposed for building packets by hand.
    pub fn set_kind(&mut self, kind: AncDataType) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Attach a typed body directly (marks the packet parsed-valid).
    /// Follow with [`generate_payload`](Self::generate_payload) to produce
    /// the matching payload bytes.
    pub fn set_body(&mut self, body: PacketBody) -> &mut Self {
        self.body = Some(body);
        self.parsed_valid = true;
        self
    }

    /// Replace the payload.
    pub fn set_payload(&mut self, data: &[u8]) -> &mut Self {
        self.payload.clear();
        self.payload.extend_from_slice(data);
        self
    }

    /// Append bytes onto the end of the existing payload. No upper bound is
    /// enforced at this layer; the wire-format codecs bound it.
    pub fn append_payload_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.payload.extend_from_slice(data);
        self
    }

    /// Append another packet's payload onto the end of this one's.
    pub fn append_payload_from(&mut self, other: &AncPacket) -> &mut Self {
        self.payload.extend_from_slice(&other.payload);
        self
    }

    /// Reset to the default-constructed state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    // --- Checksums ---

    /// The 8-bit checksum over DID + SDID + DC + payload, mod 256.
    ///
    /// This is not the official 9-bit SMPTE-291 checksum (see
    /// [`calculate_checksum9`](Self::calculate_checksum9)); it matches the
    /// low 8 bits of it. The result is never cached.
    pub fn calculate_checksum8(&self) -> u8 {
        let mut sum = self
            .did
            .wrapping_add(self.sid)
            .wrapping_add(self.payload.len() as u8);
        for byte in &self.payload {
            sum = sum.wrapping_add(*byte);
        }
        sum
    }

    /// The official 9-bit SMPTE-291 checksum: the sum of the 9-bit
    /// parity-carrying words for DID, SDID, DC and each UDW, truncated to
    /// 9 bits.
    pub fn calculate_checksum9(&self) -> u16 {
        let mut sum = u32::from(add_even_parity(self.did) & 0x1FF)
            + u32::from(add_even_parity(self.sid) & 0x1FF)
            + u32::from(add_even_parity(self.payload.len() as u8) & 0x1FF);
        for byte in &self.payload {
            sum += u32::from(add_even_parity(*byte) & 0x1FF);
        }
        (sum & 0x1FF) as u16
    }

    /// True if the stored 8-bit checksum matches the computed one.
    pub fn checksum_ok(&self) -> bool {
        self.checksum == self.calculate_checksum8()
    }

    // --- SDI capture stream (ingest) ---

    /// Initialize from one packet of a raw SDI capture stream.
    ///
    /// `buf` points at the head of the remaining capture buffer;
    /// `default_location` supplies whatever location fields the wire format
    /// does not carry (link, stream, horizontal offset). Returns the number
    /// of bytes consumed so the caller can find the next packet.
    ///
    /// An empty buffer returns `Ok(0)` — not an error, just nothing left.
    /// A missing `0xFF` marker or a declared size extending past the end of
    /// the buffer fails with [`AncError::Malformed`] without modifying any
    /// previously parsed state owned by the caller.
    pub fn init_from_received_bytes(
        &mut self,
        buf: &[u8],
        default_location: &PacketLocation,
    ) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if buf.len() < GUMP_WRAPPER_SIZE {
            return Err(AncError::Malformed {
                kind: MalformedKind::TruncatedPacket,
            });
        }
        if buf[0] != 0xFF {
            return Err(AncError::Malformed {
                kind: MalformedKind::BadGumpMarker,
            });
        }

        let dc = usize::from(buf[5]);
        let total = dc + GUMP_WRAPPER_SIZE;
        if total > buf.len() {
            return Err(AncError::Malformed {
                kind: MalformedKind::TruncatedPacket,
            });
        }

        self.did = buf[3];
        self.sid = buf[4];
        self.checksum = buf[total - 1];
        self.location = *default_location;
        self.kind = AncDataType::Unknown;
        self.body = None;
        self.parsed_valid = false;

        // The "location valid" bit gates whether the header's location bits
        // override the caller's defaults.
        if buf[1] & 0x80 != 0 {
            self.coding = if buf[1] & 0x40 != 0 {
                DataCoding::Raw
            } else {
                DataCoding::Digital
            };
            self.location.set_channel(if buf[1] & 0x20 != 0 {
                DataChannel::Y
            } else {
                DataChannel::C
            });
            self.location.set_space(if buf[1] & 0x10 != 0 {
                DataSpace::Hanc
            } else {
                DataSpace::Vanc
            });
            let line = (u16::from(buf[1] & 0x0F) << 7) | u16::from(buf[2] & 0x7F);
            self.location.set_line_number(line);
        }

        self.payload.clear();
        self.payload.extend_from_slice(&buf[6..6 + dc]);

        tracing::trace!(
            did = format_args!("{:#04X}", self.did),
            sid = format_args!("{:#04X}", self.sid),
            dc,
            line = self.location.line_number(),
            coding = ?self.coding,
            "packet parsed from SDI stream"
        );
        Ok(total)
    }

    // --- SDI capture stream (playout) ---

    /// The number of bytes [`generate_transmit_bytes`](Self::generate_transmit_bytes)
    /// will produce.
    ///
    /// Digital packets emit one GUMP packet (payload truncated at 255
    /// bytes). Raw packets split their payload across as many 255-byte GUMP
    /// packets as needed; an empty raw packet emits nothing.
    pub fn raw_packet_size(&self) -> usize {
        match self.coding {
            DataCoding::Digital => self.payload.len().min(GUMP_MAX_PAYLOAD) + GUMP_WRAPPER_SIZE,
            DataCoding::Raw => {
                if self.payload.is_empty() {
                    0
                } else {
                    let full = self.payload.len() / GUMP_MAX_PAYLOAD;
                    let rem = self.payload.len() % GUMP_MAX_PAYLOAD;
                    full * (GUMP_MAX_PAYLOAD + GUMP_WRAPPER_SIZE)
                        + if rem > 0 { rem + GUMP_WRAPPER_SIZE } else { 0 }
                }
            }
        }
    }

    /// Serialize into the SDI capture stream byte format (playout).
    ///
    /// Returns the number of bytes written. Fails with
    /// [`AncError::BufferTooSmall`] when the packet does not fit in `buf`.
    pub fn generate_transmit_bytes(&self, buf: &mut [u8]) -> Result<usize> {
        let size = self.raw_packet_size();
        if size == 0 {
            return Ok(0);
        }
        if size > buf.len() {
            return Err(AncError::BufferTooSmall {
                needed: size,
                capacity: buf.len(),
            });
        }

        match self.coding {
            DataCoding::Digital => {
                let dc = self.payload.len().min(GUMP_MAX_PAYLOAD);
                buf[0] = 0xFF;
                buf[1] = self.gump_header_byte2();
                buf[2] = (self.location.line_number() & 0x7F) as u8;
                buf[3] = self.did;
                buf[4] = self.sid;
                buf[5] = dc as u8;
                buf[6..6 + dc].copy_from_slice(&self.payload[..dc]);
                // Inserter hardware recomputes the checksum on playout; the
                // 8-bit value here matches the low 8 bits of what it emits.
                buf[6 + dc] = self.calculate_checksum8();
            }
            DataCoding::Raw => {
                let mut offset = 0;
                for chunk in self.payload.chunks(GUMP_MAX_PAYLOAD) {
                    buf[offset] = 0xFF;
                    buf[offset + 1] = self.gump_header_byte2();
                    buf[offset + 2] = (self.location.line_number() & 0x7F) as u8;
                    buf[offset + 3] = self.did;
                    buf[offset + 4] = self.sid;
                    buf[offset + 5] = chunk.len() as u8;
                    buf[offset + 6..offset + 6 + chunk.len()].copy_from_slice(chunk);
                    buf[offset + 6 + chunk.len()] = self.checksum;
                    offset += chunk.len() + GUMP_WRAPPER_SIZE;
                }
            }
        }
        Ok(size)
    }

    fn gump_header_byte2(&self) -> u8 {
        let mut b = 0x80; // location valid
        if self.coding == DataCoding::Raw {
            b |= 0x40;
        }
        if self.location.channel() == DataChannel::Y {
            b |= 0x20;
        }
        if self.location.space() == DataSpace::Hanc {
            b |= 0x10;
        }
        b | ((self.location.line_number() >> 7) & 0x0F) as u8
    }

    // --- IP/RTP payload (ingest & playout) ---

    /// Initialize from an anc packet embedded in an ST 2110-40 RTP payload.
    ///
    /// `words` holds the whole RTP payload as 32-bit words; `index` points
    /// at this packet's 4-byte sub-header and, on success, is advanced past
    /// the packet (including word-alignment padding) to the next one.
    ///
    /// The embedded 9-bit checksum word is verified against the parsed
    /// fields unless `ignore_checksum` is set.
    pub fn init_from_rtp_words(
        &mut self,
        words: &[u32],
        index: &mut usize,
        ignore_checksum: bool,
    ) -> Result<()> {
        let header_word = *words.get(*index).ok_or(AncError::Malformed {
            kind: MalformedKind::TruncatedPacket,
        })?;
        let header = AncPacketHeader::from_word(header_word);

        let mut reader = BitReader::new(words, *index + 1);
        let mut read = || {
            reader.read10().ok_or(AncError::Malformed {
                kind: MalformedKind::TruncatedPacket,
            })
        };
        let did = (read()? & 0xFF) as u8;
        let sid = (read()? & 0xFF) as u8;
        let dc = usize::from(read()? & 0xFF);

        let mut payload = Vec::with_capacity(dc);
        for _ in 0..dc {
            payload.push((read()? & 0xFF) as u8);
        }
        let checksum_word = read()? & 0x1FF;

        self.did = did;
        self.sid = sid;
        self.payload = payload;
        self.checksum = (checksum_word & 0xFF) as u8;
        self.coding = DataCoding::Digital;
        self.location = header.to_location();
        self.kind = AncDataType::Unknown;
        self.body = None;
        self.parsed_valid = false;

        if !ignore_checksum {
            let computed = self.calculate_checksum9();
            if checksum_word != computed {
                return Err(AncError::ChecksumMismatch {
                    stored: checksum_word,
                    computed,
                });
            }
        }

        *index = reader.word_index_aligned();
        Ok(())
    }

    /// Append this packet, in ST 2110-40 layout, onto an RTP payload word
    /// vector: the 4-byte sub-header, then DID/SDID/DC/UDWs/checksum as
    /// 10-bit symbols packed MSB-first, zero-padded to a word boundary.
    ///
    /// Only digital packets have an RTP representation; the payload must
    /// fit the 8-bit DC field.
    pub fn generate_rtp_words(&self, out: &mut Vec<u32>) -> Result<()> {
        if self.coding != DataCoding::Digital {
            return Err(AncError::InvalidArgument(
                "RTP anc carriage is digital-only",
            ));
        }
        if self.payload.len() > GUMP_MAX_PAYLOAD {
            return Err(AncError::InvalidArgument(
                "payload exceeds the 255-byte RTP anc packet limit",
            ));
        }

        out.push(AncPacketHeader::from_location(&self.location).to_word());

        let mut writer = BitWriter::new(out);
        writer.push10(add_even_parity(self.did));
        writer.push10(add_even_parity(self.sid));
        writer.push10(add_even_parity(self.payload.len() as u8));
        for byte in &self.payload {
            writer.push10(add_even_parity(*byte));
        }
        let cs9 = self.calculate_checksum9();
        writer.push10(cs9 | ((!(cs9 >> 8) & 1) << 9));
        writer.finish();
        Ok(())
    }

    // --- VANC raster line (playout) ---

    /// Append this packet as 10-bit VANC component words: the ancillary
    /// data flag `0x000 0x3FF 0x3FF`, DID/SDID/DC/UDWs with even parity,
    /// then the 9-bit checksum word (bit 9 = complement of bit 8).
    pub fn generate_vanc_words(&self, out: &mut Vec<u16>) -> Result<()> {
        if self.payload.len() > GUMP_MAX_PAYLOAD {
            return Err(AncError::InvalidArgument(
                "payload exceeds the 255-byte SMPTE-291 packet limit",
            ));
        }
        out.extend_from_slice(&[0x000, 0x3FF, 0x3FF]);
        out.push(add_even_parity(self.did));
        out.push(add_even_parity(self.sid));
        out.push(add_even_parity(self.payload.len() as u8));
        for byte in &self.payload {
            out.push(add_even_parity(*byte));
        }
        let cs9 = self.calculate_checksum9();
        out.push(cs9 | ((!(cs9 >> 8) & 1) << 9));
        Ok(())
    }

    // --- Typed payload hooks ---

    /// Interpret the payload according to this packet's recognized type.
    ///
    /// Sets [`parsed_valid`](Self::parsed_valid) to reflect whether the
    /// subtype recognized the content as structurally sound — a soft
    /// signal. Unrecognized/generic packets are a no-op success with
    /// `parsed_valid` false.
    pub fn parse_payload(&mut self) -> Result<()> {
        match packets::parse_body(self) {
            Ok(Some(body)) => {
                self.body = Some(body);
                self.parsed_valid = true;
                Ok(())
            }
            Ok(None) => {
                self.body = None;
                self.parsed_valid = false;
                Ok(())
            }
            Err(e) => {
                self.body = None;
                self.parsed_valid = false;
                Err(e)
            }
        }
    }

    /// Regenerate the payload bytes (and subtype default DID/SDID) from the
    /// parsed body. A no-op success for generic packets with no body.
    pub fn generate_payload(&mut self) -> Result<()> {
        match self.body.clone() {
            Some(body) => packets::generate_payload(&body, self),
            None => Ok(()),
        }
    }

    // --- Comparison ---

    /// Field-by-field comparison with optional exclusions.
    ///
    /// On mismatch the error describes *what* differed, so callers can log
    /// it; the recognized type and parse state are not compared.
    pub fn compare(
        &self,
        other: &AncPacket,
        ignore_location: bool,
        ignore_checksum: bool,
    ) -> Result<()> {
        let mut diffs = Vec::new();
        if self.did != other.did {
            diffs.push(format!("DID: {:#04X} vs {:#04X}", self.did, other.did));
        }
        if self.sid != other.sid {
            diffs.push(format!("SDID: {:#04X} vs {:#04X}", self.sid, other.sid));
        }
        if self.payload.len() != other.payload.len() {
            diffs.push(format!(
                "DC: {} vs {}",
                self.payload.len(),
                other.payload.len()
            ));
        } else if self.payload != other.payload {
            diffs.push("payload bytes differ".to_string());
        }
        if self.coding != other.coding {
            diffs.push(format!("coding: {:?} vs {:?}", self.coding, other.coding));
        }
        if !ignore_checksum && self.checksum != other.checksum {
            diffs.push(format!(
                "checksum: {:#04X} vs {:#04X}",
                self.checksum, other.checksum
            ));
        }
        if !ignore_location {
            for d in self.location.compare_with_info(&other.location) {
                diffs.push(format!("location {d}"));
            }
        }
        if diffs.is_empty() {
            Ok(())
        } else {
            Err(AncError::PacketsDiffer(diffs.join("\n")))
        }
    }
}

impl fmt::Display for AncPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}|{}|DID/SDID {:#04X}/{:#04X}|DC {}]",
            self.coding,
            self.location,
            self.did,
            self.sid,
            self.payload.len()
        )
    }
}

/// The given byte in bits 7:0, even parity in bit 8, and the complement of
/// bit 8 in bit 9 — the 10-bit User Data Word form used in raster lines and
/// RTP payloads.
pub fn add_even_parity(byte: u8) -> u16 {
    let parity = (byte.count_ones() & 1) as u16;
    u16::from(byte) | (parity << 8) | ((1 - parity) << 9)
}

/// A human-readable name for a well-known DID/SDID assignment, or an empty
/// string for unknown/unregistered values.
pub fn did_sid_to_string(did: u8, sid: u8) -> &'static str {
    match (did, sid) {
        (0x00, _) => "SMPTE-291 Control Packet",
        (0x41, 0x01) => "SMPTE-352M Payload ID",
        (0x41, 0x05) => "SMPTE-2016-3 AFD/Bar Data",
        (0x41, 0x07) => "SMPTE-2010 ANSI/SCTE 104 Msgs",
        (0x43, 0x02) => "RDD08/OP-47 Teletext Subtitling",
        (0x45, 0x01..=0x09) => "RP-2020 Compr/Dolby Aud MetaD",
        (0x50, 0x01) => "RDD08 WSS Data",
        (0x51, 0x01) => "RP-215 Film Transfer Info",
        (0x5F, 0xDF) => "ARIB STD-B37 HD Captions",
        (0x5F, 0xDE) => "ARIB STD-B37 SD Captions",
        (0x60, 0x60) => "SMPTE-12M ATC Timecode",
        (0x61, 0x01) => "SMPTE-334 HD CEA-708 CC",
        (0x61, 0x02) => "SMPTE-334 SD CEA-608 CC",
        (0x62, 0x01) => "RP-207 DTV Program Desc",
        (0x62, 0x02) => "SMPTE-334 Data Broadcast",
        (0x62, 0x03) => "RP-208 VBI Data",
        (0x64, 0x64) => "RP-196 LTC in HANC (Obs)",
        (0x80, _) => "SMPTE-291 Ctrl Pkt 'Marked for Deletion'",
        (0xF4, _) => "RP-165 Error Detect/Checkwords",
        _ => "",
    }
}
