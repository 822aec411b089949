//! Error types for the ancillary data library.

use std::fmt;

/// Errors that can occur while modeling or serializing ancillary data.
///
/// Variants map to specific failure modes across the stack:
///
/// - **Wire parsing**: [`Malformed`](Self::Malformed) — bad magic bytes,
///   bad preambles, truncated structures.
/// - **Integrity**: [`ChecksumMismatch`](Self::ChecksumMismatch) — a stored
///   checksum disagrees with the freshly computed one (only raised when
///   validation was requested).
/// - **Capacity**: [`BufferTooSmall`](Self::BufferTooSmall) — a destination
///   buffer cannot hold the serialized output, or a received buffer is
///   shorter than its header claims.
/// - **Raster**: [`Unsupported`](Self::Unsupported),
///   [`InsertionFailed`](Self::InsertionFailed) — geometry the VANC codec
///   cannot handle, or a raster write where nothing could be placed.
/// - **Comparison**: [`PacketsDiffer`](Self::PacketsDiffer) — carries a
///   description of *what* differed, not just that something did.
#[derive(Debug, thiserror::Error)]
pub enum AncError {
    /// A required input buffer was missing or empty.
    #[error("required input buffer is missing or empty")]
    NullInput,

    /// An argument was outside its legal domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Received wire data failed structural validation.
    #[error("malformed wire data: {kind}")]
    Malformed { kind: MalformedKind },

    /// A stored checksum did not match the computed one.
    ///
    /// Values are widened to `u16` so the 9-bit SMPTE-291 checksum fits.
    #[error("checksum mismatch: stored {stored:#05X}, computed {computed:#05X}")]
    ChecksumMismatch { stored: u16, computed: u16 },

    /// A destination buffer is too small for the data to be written, or a
    /// source buffer is shorter than its own header declares.
    #[error("buffer too small: need {needed} bytes, have {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// The raster geometry or pixel layout is not handled by this codec.
    #[error("unsupported raster geometry: {0}")]
    Unsupported(&'static str),

    /// A VANC raster write placed zero packets while at least one failed.
    #[error("no packets could be inserted into the VANC raster ({failed} failed)")]
    InsertionFailed { failed: usize },

    /// Two packets (or two lists) compared unequal.
    ///
    /// The payload is a newline-delimited description of every field that
    /// differed, suitable for logging.
    #[error("packets differ:\n{0}")]
    PacketsDiffer(String),
}

/// Specific kind of structural wire-format failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedKind {
    /// An SDI capture stream packet did not begin with the `0xFF` marker.
    BadGumpMarker,
    /// A packet's declared size extends past the end of its buffer, or the
    /// buffer is shorter than the minimum packet size.
    TruncatedPacket,
    /// A VANC word sequence did not begin with `0x000 0x3FF 0x3FF`.
    BadAncPreamble,
    /// An RTP payload header failed validation (bad version or field bits).
    BadRtpHeader,
    /// A 10-bit component word carried inconsistent parity bits.
    BadParity,
    /// A subtype payload is too short for its declared structure.
    PayloadTooShort,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadGumpMarker => write!(f, "missing 0xFF packet marker"),
            Self::TruncatedPacket => write!(f, "truncated packet"),
            Self::BadAncPreamble => write!(f, "missing 0x000/0x3FF/0x3FF preamble"),
            Self::BadRtpHeader => write!(f, "invalid RTP payload header"),
            Self::BadParity => write!(f, "bad 10-bit word parity"),
            Self::PayloadTooShort => write!(f, "payload too short"),
        }
    }
}

/// Convenience alias for `Result<T, AncError>`.
pub type Result<T> = std::result::Result<T, AncError>;
