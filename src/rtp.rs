//! ST 2110-40 RTP wire structures for ancillary data.
//!
//! Two fixed-layout records map the IP transport framing to and from
//! 32-bit network-order words:
//!
//! [`PayloadHeader`] — the 20-byte header at the front of every anc RTP
//! payload:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |V=2|P|X|  CC   |M|     PT      |   Sequence Number (low 16)    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                           Timestamp                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                             SSRC                              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   Sequence Number (high 16)   |        Payload Length         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   ANC Count   | F |                 reserved                  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! [`AncPacketHeader`] — the 4-byte sub-header at the start of each anc
//! packet inside the payload (RFC 8331 §2.1):
//!
//! ```text
//! |C| Line Number (11) | Horizontal Offset (12) |S| StreamNum (7) |
//! ```
//!
//! The F (field) bits signal 0 = progressive, 2 = field 1, 3 = field 2;
//! value 1 is invalid. The two hard wire limits every transmit path must
//! honor are [`MAX_PACKETS_PER_FIELD`] and [`MAX_PAYLOAD_BYTES_PER_FIELD`].

use std::fmt;

use crate::error::{AncError, MalformedKind, Result};
use crate::location::{
    DataChannel, DataLink, DataSpace, DataStream, HORIZ_OFFSET_ANY_HANC, PacketLocation,
};

/// Number of 32-bit words in an RTP anc payload header.
pub const HEADER_WORD_COUNT: usize = 5;
/// Number of bytes in an RTP anc payload header.
pub const HEADER_BYTE_COUNT: usize = HEADER_WORD_COUNT * 4;

/// Hard wire limit: anc packets per field (8-bit count field).
pub const MAX_PACKETS_PER_FIELD: usize = 255;
/// Hard wire limit: serialized anc payload bytes per field (16-bit length
/// field), i.e. at most 16 383 whole 32-bit words.
pub const MAX_PAYLOAD_BYTES_PER_FIELD: usize = 65_535;

/// Field-signal code for progressive / no field specified.
pub const FIELD_SIGNAL_PROGRESSIVE: u8 = 0;
/// Field-signal code for field 1.
pub const FIELD_SIGNAL_FIELD1: u8 = 2;
/// Field-signal code for field 2.
pub const FIELD_SIGNAL_FIELD2: u8 = 3;

/// The header of an ST 2110-40 anc RTP payload.
///
/// Sequence number is held as the full 32-bit extended value; the low 16
/// bits live in word 0 and the high 16 bits in word 3 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadHeader {
    version: u8,
    padding: bool,
    extension: bool,
    cc_bits: u8,
    marker: bool,
    payload_type: u8,
    sequence_number: u32,
    timestamp: u32,
    sync_source_id: u32,
    payload_length: u16,
    anc_count: u8,
    field_signal: u8,
}

impl Default for PayloadHeader {
    fn default() -> Self {
        Self {
            version: 2,
            padding: false,
            extension: false,
            cc_bits: 0,
            marker: false,
            payload_type: 0,
            sequence_number: 0,
            timestamp: 0,
            sync_source_id: 0,
            payload_length: 0,
            anc_count: 0,
            field_signal: FIELD_SIGNAL_PROGRESSIVE,
        }
    }
}

impl PayloadHeader {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Inquiry ---

    /// True if every field is zero or false — the state a buffer of zeroes
    /// decodes to. A NULL header means "nothing to add", not an error.
    pub fn is_null(&self) -> bool {
        self.version == 0
            && !self.padding
            && !self.extension
            && self.cc_bits == 0
            && !self.marker
            && self.payload_type == 0
            && self.sequence_number == 0
            && self.timestamp == 0
            && self.sync_source_id == 0
            && self.payload_length == 0
            && self.anc_count == 0
            && self.field_signal == 0
    }

    /// Structural validity: RTP version 2 and a legal field signal.
    pub fn is_valid(&self) -> bool {
        self.version == 2 && self.field_signal != 1
    }

    pub fn is_progressive(&self) -> bool {
        self.field_signal == FIELD_SIGNAL_PROGRESSIVE
    }

    pub fn is_field1(&self) -> bool {
        self.field_signal == FIELD_SIGNAL_FIELD1
    }

    pub fn is_field2(&self) -> bool {
        self.field_signal == FIELD_SIGNAL_FIELD2
    }

    /// True if the marker bit (end of field/frame) is set.
    pub fn is_end_of_field_or_frame(&self) -> bool {
        self.marker
    }

    pub fn payload_type(&self) -> u8 {
        self.payload_type
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    pub fn sync_source_id(&self) -> u32 {
        self.sync_source_id
    }

    /// Payload length in bytes, starting at the first packet's C bit.
    pub fn payload_length(&self) -> u16 {
        self.payload_length
    }

    /// Number of SMPTE 291 anc packets in this payload.
    pub fn anc_count(&self) -> u8 {
        self.anc_count
    }

    pub fn field_signal(&self) -> u8 {
        self.field_signal & 3
    }

    // --- Setters (builder style) ---

    pub fn set_progressive(&mut self) -> &mut Self {
        self.field_signal = FIELD_SIGNAL_PROGRESSIVE;
        self
    }

    pub fn set_field1(&mut self) -> &mut Self {
        self.field_signal = FIELD_SIGNAL_FIELD1;
        self
    }

    pub fn set_field2(&mut self) -> &mut Self {
        self.field_signal = FIELD_SIGNAL_FIELD2;
        self
    }

    pub fn set_payload_type(&mut self, pt: u8) -> &mut Self {
        self.payload_type = pt & 0x7F;
        self
    }

    pub fn set_sequence_number(&mut self, seq: u32) -> &mut Self {
        self.sequence_number = seq;
        self
    }

    pub fn set_timestamp(&mut self, ts: u32) -> &mut Self {
        self.timestamp = ts;
        self
    }

    pub fn set_sync_source_id(&mut self, ssrc: u32) -> &mut Self {
        self.sync_source_id = ssrc;
        self
    }

    pub fn set_payload_length(&mut self, bytes: u16) -> &mut Self {
        self.payload_length = bytes;
        self
    }

    pub fn set_anc_count(&mut self, count: u8) -> &mut Self {
        self.anc_count = count;
        self
    }

    pub fn set_cc_bits(&mut self, cc: u8) -> &mut Self {
        self.cc_bits = cc & 0x0F;
        self
    }

    pub fn set_end_of_field_or_frame(&mut self, last: bool) -> &mut Self {
        self.marker = last;
        self
    }

    // --- I/O ---

    /// The five 32-bit header words for the current state.
    pub fn words(&self) -> [u32; HEADER_WORD_COUNT] {
        [
            (u32::from(self.version) << 30)
                | (u32::from(self.padding) << 29)
                | (u32::from(self.extension) << 28)
                | (u32::from(self.cc_bits) << 24)
                | (u32::from(self.marker) << 23)
                | (u32::from(self.payload_type) << 16)
                | (self.sequence_number & 0xFFFF),
            self.timestamp,
            self.sync_source_id,
            ((self.sequence_number >> 16) << 16) | u32::from(self.payload_length),
            (u32::from(self.anc_count) << 24) | (u32::from(self.field_signal & 3) << 22),
        ]
    }

    /// Append the header words to a word vector.
    pub fn write_to_words(&self, out: &mut Vec<u32>) {
        out.extend_from_slice(&self.words());
    }

    /// Append the header to a byte buffer, each word in network byte order.
    pub fn write_to_bytes(&self, out: &mut Vec<u8>) {
        for word in self.words() {
            out.extend_from_slice(&word.to_be_bytes());
        }
    }

    /// Decode a header from the first five words of `words`.
    ///
    /// Fails with [`AncError::BufferTooSmall`] when fewer than five words
    /// are present. Structural validity is *not* checked here; callers
    /// decide how to treat NULL or invalid headers.
    pub fn read_from_words(words: &[u32]) -> Result<Self> {
        if words.len() < HEADER_WORD_COUNT {
            return Err(AncError::BufferTooSmall {
                needed: HEADER_BYTE_COUNT,
                capacity: words.len() * 4,
            });
        }
        let w0 = words[0];
        let w3 = words[3];
        let w4 = words[4];
        Ok(Self {
            version: (w0 >> 30) as u8,
            padding: w0 & (1 << 29) != 0,
            extension: w0 & (1 << 28) != 0,
            cc_bits: ((w0 >> 24) & 0x0F) as u8,
            marker: w0 & (1 << 23) != 0,
            payload_type: ((w0 >> 16) & 0x7F) as u8,
            sequence_number: ((w3 >> 16) << 16) | (w0 & 0xFFFF),
            timestamp: words[1],
            sync_source_id: words[2],
            payload_length: (w3 & 0xFFFF) as u16,
            anc_count: (w4 >> 24) as u8,
            field_signal: ((w4 >> 22) & 3) as u8,
        })
    }
}

impl fmt::Display for PayloadHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = match self.field_signal {
            FIELD_SIGNAL_PROGRESSIVE => "progressive",
            FIELD_SIGNAL_FIELD1 => "field 1",
            FIELD_SIGNAL_FIELD2 => "field 2",
            _ => "invalid",
        };
        write!(
            f,
            "RTP anc payload: seq {} ts {} ssrc {:#010X} len {} count {} ({field}){}",
            self.sequence_number,
            self.timestamp,
            self.sync_source_id,
            self.payload_length,
            self.anc_count,
            if self.marker { " [end]" } else { "" }
        )
    }
}

/// The 4-byte header preceding each anc packet inside an RTP payload.
///
/// A direct, lossless mapping to and from [`PacketLocation`]: the C bit
/// selects the chroma channel, the S bit flags a meaningful stream number
/// (1..=4 for DS1..DS4, from which the link follows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AncPacketHeader {
    c_channel: bool,
    line_number: u16,
    horiz_offset: u16,
    stream_valid: bool,
    stream_number: u8,
}

impl AncPacketHeader {
    /// Build from a raster location.
    pub fn from_location(location: &PacketLocation) -> Self {
        let (stream_valid, stream_number) = match location.stream() {
            DataStream::DS1 => (true, 1),
            DataStream::DS2 => (true, 2),
            DataStream::DS3 => (true, 3),
            DataStream::DS4 => (true, 4),
            DataStream::Unknown => (false, 0),
        };
        Self {
            c_channel: location.channel() == DataChannel::C,
            line_number: location.line_number() & 0x7FF,
            horiz_offset: location.horiz_offset() & 0xFFF,
            stream_valid,
            stream_number,
        }
    }

    /// Decode from the network-order 32-bit header word.
    pub fn from_word(word: u32) -> Self {
        Self {
            c_channel: word & (1 << 31) != 0,
            line_number: ((word >> 20) & 0x7FF) as u16,
            horiz_offset: ((word >> 8) & 0xFFF) as u16,
            stream_valid: word & (1 << 7) != 0,
            stream_number: (word & 0x7F) as u8,
        }
    }

    /// The 32-bit header word for the current state.
    pub fn to_word(self) -> u32 {
        (u32::from(self.c_channel) << 31)
            | (u32::from(self.line_number & 0x7FF) << 20)
            | (u32::from(self.horiz_offset & 0xFFF) << 8)
            | (u32::from(self.stream_valid) << 7)
            | u32::from(self.stream_number & 0x7F)
    }

    pub fn is_c_bit_set(self) -> bool {
        self.c_channel
    }

    pub fn is_s_bit_set(self) -> bool {
        self.stream_valid
    }

    pub fn line_number(self) -> u16 {
        self.line_number
    }

    pub fn horiz_offset(self) -> u16 {
        self.horiz_offset
    }

    pub fn stream_number(self) -> u8 {
        self.stream_number
    }

    /// The raster location this header describes.
    ///
    /// The RTP header carries no explicit VANC/HANC flag; the space is
    /// inferred from the horizontal-offset sentinel (any-HANC → HANC,
    /// everything else → VANC).
    pub fn to_location(self) -> PacketLocation {
        let stream = if self.stream_valid {
            match self.stream_number {
                1 => DataStream::DS1,
                2 => DataStream::DS2,
                3 => DataStream::DS3,
                4 => DataStream::DS4,
                _ => DataStream::Unknown,
            }
        } else {
            DataStream::Unknown
        };
        let link = match stream {
            DataStream::DS1 | DataStream::DS2 => DataLink::A,
            DataStream::DS3 | DataStream::DS4 => DataLink::B,
            DataStream::Unknown => DataLink::Unknown,
        };
        let space = if self.horiz_offset == HORIZ_OFFSET_ANY_HANC {
            DataSpace::Hanc
        } else {
            DataSpace::Vanc
        };
        let channel = if self.c_channel {
            DataChannel::C
        } else {
            DataChannel::Y
        };
        PacketLocation::new(
            link,
            stream,
            channel,
            space,
            self.line_number,
            self.horiz_offset,
        )
    }
}

impl fmt::Display for AncPacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "anc pkt hdr: {} L{} H{} stream {}{}",
            if self.c_channel { "C" } else { "Y" },
            self.line_number,
            self.horiz_offset,
            self.stream_number,
            if self.stream_valid { "" } else { " (unset)" }
        )
    }
}

/// Packs 10-bit symbols MSB-first into 32-bit words.
pub(crate) struct BitWriter<'a> {
    out: &'a mut Vec<u32>,
    current: u32,
    bits_used: u32,
}

impl<'a> BitWriter<'a> {
    pub fn new(out: &'a mut Vec<u32>) -> Self {
        Self {
            out,
            current: 0,
            bits_used: 0,
        }
    }

    /// Append the low 10 bits of `value`.
    pub fn push10(&mut self, value: u16) {
        let v = u32::from(value & 0x3FF);
        let free = 32 - self.bits_used;
        if free >= 10 {
            self.current |= v << (free - 10);
            self.bits_used += 10;
            if self.bits_used == 32 {
                self.out.push(self.current);
                self.current = 0;
                self.bits_used = 0;
            }
        } else {
            // Split across the word boundary.
            self.current |= v >> (10 - free);
            self.out.push(self.current);
            self.bits_used = 10 - free;
            self.current = v << (32 - self.bits_used);
        }
    }

    /// Flush any partial word, zero-padded.
    pub fn finish(self) {
        if self.bits_used > 0 {
            self.out.push(self.current);
        }
    }
}

/// Reads 10-bit symbols MSB-first from 32-bit words.
pub(crate) struct BitReader<'a> {
    words: &'a [u32],
    word: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(words: &'a [u32], start_word: usize) -> Self {
        Self {
            words,
            word: start_word,
            bit: 0,
        }
    }

    /// Read the next 10-bit symbol, or `None` past the end of the buffer.
    pub fn read10(&mut self) -> Option<u16> {
        let mut value = 0u16;
        for _ in 0..10 {
            let word = *self.words.get(self.word)?;
            let bit = (word >> (31 - self.bit)) & 1;
            value = (value << 1) | bit as u16;
            self.bit += 1;
            if self.bit == 32 {
                self.bit = 0;
                self.word += 1;
            }
        }
        Some(value)
    }

    /// The index of the next unread word, counting a partially-read word as
    /// consumed (i.e. aligned up to the word boundary).
    pub fn word_index_aligned(&self) -> usize {
        if self.bit == 0 { self.word } else { self.word + 1 }
    }
}
