//! Where an ancillary packet lives within the video raster.
//!
//! A [`PacketLocation`] pins a packet to a link, data stream, Y/C channel,
//! raster space and line, plus a 12-bit horizontal offset. Locations have a
//! total order (see [`PacketLocation::ordinal`]) that defines the canonical
//! playout order used by the list's location sort.

use std::fmt;

/// Which link of a dual-link video stream carries the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataLink {
    A = 0,
    B = 1,
    #[default]
    Unknown = 2,
}

impl DataLink {
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }
}

/// Which data stream (DS1..DS4) carries the data.
///
/// DS1 and DS2 ride link A; DS3 and DS4 ride link B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataStream {
    DS1 = 0,
    DS2 = 1,
    DS3 = 2,
    DS4 = 3,
    #[default]
    Unknown = 4,
}

impl DataStream {
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }
}

/// Which component channel carries the data: chroma or luma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataChannel {
    C = 0,
    Y = 1,
    #[default]
    Unknown = 2,
}

impl DataChannel {
    /// SD only: the data rides both channels, muxed. Alias of [`DataChannel::C`].
    pub const BOTH: DataChannel = DataChannel::C;

    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }
}

/// Which raster section contains the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSpace {
    /// Between SAV and EAV (vertical blanking area).
    Vanc = 0,
    /// Between EAV and SAV (horizontal blanking area).
    Hanc = 1,
    #[default]
    Unknown = 2,
}

impl DataSpace {
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }
}

/// Packet line number is unknown.
pub const LINE_NUMBER_UNKNOWN: u16 = 0x0000;
/// Packet may be placed/found on any legal line number.
pub const LINE_NUMBER_DONT_CARE: u16 = 0x07FF;

/// Horizontal offset zero: immediately after SAV.
pub const HORIZ_OFFSET_DEFAULT: u16 = 0x0000;
/// Packet may be placed/found in any legal area of the raster line.
pub const HORIZ_OFFSET_ANYWHERE: u16 = 0x0FFF;
/// HANC: any legal area of the raster line after EAV.
pub const HORIZ_OFFSET_ANY_HANC: u16 = 0x0FFE;
/// VANC: any legal area of the raster line after SAV, before EAV.
pub const HORIZ_OFFSET_ANY_VANC: u16 = 0x0FFD;

/// Immutable description of where a packet lives in the raster.
///
/// Equality requires all six fields to be equal. Ordering is a composite
/// key, most-significant first: line number, data space, horizontal offset,
/// channel, stream, link — exposed via [`ordinal`](Self::ordinal) rather
/// than `Ord` because the ordinal normalizes horizontal-offset sentinels
/// and would disagree with field-wise equality.
///
/// The per-field setters deliberately ignore `Unknown` values and keep the
/// previous state; this is a "no-op on invalid input, not an error" contract
/// that existing callers rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketLocation {
    link: DataLink,
    stream: DataStream,
    channel: DataChannel,
    space: DataSpace,
    line_number: u16,
    horiz_offset: u16,
}

impl Default for PacketLocation {
    fn default() -> Self {
        Self {
            link: DataLink::Unknown,
            stream: DataStream::Unknown,
            channel: DataChannel::Unknown,
            space: DataSpace::Unknown,
            line_number: LINE_NUMBER_UNKNOWN,
            horiz_offset: HORIZ_OFFSET_DEFAULT,
        }
    }
}

impl PacketLocation {
    pub fn new(
        link: DataLink,
        stream: DataStream,
        channel: DataChannel,
        space: DataSpace,
        line_number: u16,
        horiz_offset: u16,
    ) -> Self {
        Self {
            link,
            stream,
            channel,
            space,
            line_number,
            horiz_offset: horiz_offset & 0x0FFF,
        }
    }

    pub fn link(&self) -> DataLink {
        self.link
    }

    pub fn stream(&self) -> DataStream {
        self.stream
    }

    pub fn channel(&self) -> DataChannel {
        self.channel
    }

    pub fn space(&self) -> DataSpace {
        self.space
    }

    /// SMPTE line number within the frame.
    pub fn line_number(&self) -> u16 {
        self.line_number
    }

    /// 12-bit horizontal offset, or one of the `HORIZ_OFFSET_*` sentinels.
    ///
    /// For HD this counts luma samples; for SD it counts Y/C muxed words.
    pub fn horiz_offset(&self) -> u16 {
        self.horiz_offset & 0x0FFF
    }

    pub fn is_luma(&self) -> bool {
        self.channel == DataChannel::Y
    }

    pub fn is_chroma(&self) -> bool {
        self.channel == DataChannel::C
    }

    pub fn is_vanc(&self) -> bool {
        self.space == DataSpace::Vanc
    }

    pub fn is_hanc(&self) -> bool {
        self.space == DataSpace::Hanc
    }

    /// Set the link. Ignores `Unknown` (previous value is kept).
    pub fn set_link(&mut self, link: DataLink) -> &mut Self {
        if link.is_valid() {
            self.link = link;
        }
        self
    }

    /// Set the data stream. Ignores `Unknown`.
    pub fn set_stream(&mut self, stream: DataStream) -> &mut Self {
        if stream.is_valid() {
            self.stream = stream;
        }
        self
    }

    /// Set the channel. Ignores `Unknown`.
    pub fn set_channel(&mut self, channel: DataChannel) -> &mut Self {
        if channel.is_valid() {
            self.channel = channel;
        }
        self
    }

    /// Set the raster space. Ignores `Unknown`.
    pub fn set_space(&mut self, space: DataSpace) -> &mut Self {
        if space.is_valid() {
            self.space = space;
        }
        self
    }

    /// Set the SMPTE line number. No range check — the frame size is not
    /// known at this layer.
    pub fn set_line_number(&mut self, line_number: u16) -> &mut Self {
        self.line_number = line_number;
        self
    }

    /// Set the horizontal offset. Only the least-significant 12 bits are used.
    pub fn set_horiz_offset(&mut self, horiz_offset: u16) -> &mut Self {
        self.horiz_offset = horiz_offset & 0x0FFF;
        self
    }

    /// 64-bit ordinal used for sorting into canonical playout order.
    ///
    /// Highest to lowest order of magnitude: line number, data space,
    /// horizontal offset (the "any VANC" / "anywhere" sentinels normalize
    /// to zero), channel, stream, link.
    pub fn ordinal(&self) -> u64 {
        let h = match self.horiz_offset {
            HORIZ_OFFSET_ANY_VANC | HORIZ_OFFSET_ANYWHERE => 0,
            h => u64::from(h),
        };
        (u64::from(self.line_number) << 27)
            | ((self.space as u64) << 24)
            | (h << 12)
            | ((self.channel as u64) << 9)
            | ((self.stream as u64) << 2)
            | (self.link as u64)
    }

    /// Collect a human-readable description of every field that differs
    /// from `other`. Empty when equal.
    pub fn compare_with_info(&self, other: &Self) -> Vec<String> {
        let mut diffs = Vec::new();
        if self.link != other.link {
            diffs.push(format!("link: {:?} vs {:?}", self.link, other.link));
        }
        if self.stream != other.stream {
            diffs.push(format!("stream: {:?} vs {:?}", self.stream, other.stream));
        }
        if self.channel != other.channel {
            diffs.push(format!("channel: {:?} vs {:?}", self.channel, other.channel));
        }
        if self.space != other.space {
            diffs.push(format!("space: {:?} vs {:?}", self.space, other.space));
        }
        if self.line_number != other.line_number {
            diffs.push(format!(
                "line: {} vs {}",
                self.line_number, other.line_number
            ));
        }
        if self.horiz_offset != other.horiz_offset {
            diffs.push(format!(
                "horiz offset: {} vs {}",
                self.horiz_offset, other.horiz_offset
            ));
        }
        diffs
    }
}

impl fmt::Display for PacketLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let link = match self.link {
            DataLink::A => "A",
            DataLink::B => "B",
            DataLink::Unknown => "?",
        };
        let stream = match self.stream {
            DataStream::DS1 => "DS1",
            DataStream::DS2 => "DS2",
            DataStream::DS3 => "DS3",
            DataStream::DS4 => "DS4",
            DataStream::Unknown => "DS?",
        };
        let channel = match self.channel {
            DataChannel::C => "C",
            DataChannel::Y => "Y",
            DataChannel::Unknown => "?",
        };
        let space = match self.space {
            DataSpace::Vanc => "VANC",
            DataSpace::Hanc => "HANC",
            DataSpace::Unknown => "?",
        };
        write!(
            f,
            "{}|{}|{}|{}|L{}|H{}",
            link, stream, channel, space, self.line_number, self.horiz_offset
        )
    }
}
