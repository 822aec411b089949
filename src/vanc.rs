//! VANC raster-line codecs and the frame-geometry contract.
//!
//! A VANC line is an ordered sequence of 10-bit component samples held in
//! `u16` words, chroma and luma interleaved (`C Y C Y …`, `2 × width` words
//! per line). An embedded SMPTE-291 packet begins with the ancillary data
//! flag `0x000 0x3FF 0x3FF`, followed by DID, SDID, DC, the UDWs, and a
//! checksum word. Payload bytes carry even parity in bit 8 and its
//! complement in bit 9 (see [`crate::packet::add_even_parity`]).
//!
//! Pixel-format conversion (packing these component words into frame-buffer
//! pixel formats) belongs to the surrounding raster layer; this module only
//! deals in already-unpacked component words plus a [`RasterDescriptor`]
//! describing the geometry.

use crate::error::{AncError, Result};
use crate::packet::add_even_parity;

/// Which channel of a component line to search for packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelSearch {
    /// Only luma samples.
    Y,
    /// Only chroma samples.
    C,
    /// Both, muxed (SD only).
    Both,
}

/// Ingest policy knobs for VANC line scanning.
///
/// Threaded through explicitly rather than held as process state so two
/// capture pipelines can run different policies.
#[derive(Debug, Clone, Copy, Default)]
pub struct VancIngestOptions {
    /// Keep packets whose data count is zero. Default: exclude them.
    pub include_zero_length: bool,
}

/// Frame geometry as supplied by the device/raster layer.
///
/// Lines are addressed by SMPTE line number; the VANC region spans
/// `first_vanc_line..first_active_line`, one raster row per line, starting
/// at row zero of the buffer this descriptor accompanies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterDescriptor {
    /// Active width in pixels (luma samples per line).
    pub width: u32,
    /// Active height in lines.
    pub height: u32,
    /// SMPTE line number of the first (top) raster row.
    pub first_vanc_line: u16,
    /// SMPTE line number where the active picture begins.
    pub first_active_line: u16,
    /// SD rasters mux anc data across both channels.
    pub is_sd: bool,
}

impl RasterDescriptor {
    /// Component words per raster row (C and Y interleaved).
    pub fn words_per_line(&self) -> usize {
        self.width as usize * 2
    }

    /// Number of VANC rows in the buffer.
    pub fn vanc_line_count(&self) -> usize {
        usize::from(self.first_active_line.saturating_sub(self.first_vanc_line))
    }

    /// The buffer row holding the given SMPTE line, if it is a VANC line.
    pub fn vanc_row(&self, smpte_line: u16) -> Option<usize> {
        (self.first_vanc_line..self.first_active_line)
            .contains(&smpte_line)
            .then(|| usize::from(smpte_line - self.first_vanc_line))
    }

    /// Basic sanity for geometry this codec can handle.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AncError::Unsupported("zero-sized raster"));
        }
        if self.first_active_line <= self.first_vanc_line {
            return Err(AncError::Unsupported("empty VANC region"));
        }
        Ok(())
    }
}

/// True if a 10-bit word has consistent parity bits: bit 8 is even parity
/// over bits 7:0 and bit 9 is its complement.
fn parity_ok(word: u16) -> bool {
    add_even_parity((word & 0xFF) as u8) == word & 0x3FF
}

/// Extract every SMPTE-291 packet embedded in one component line.
///
/// `line` is the full interleaved line; `search` selects which channel's
/// samples to scan (use [`ChannelSearch::Both`] for SD). Returns one word
/// vector per packet — each starting with `0x000 0x3FF 0x3FF` and ending
/// with the checksum word — plus each packet's word offset into the
/// original line (from which the channel can be discerned: even = chroma).
///
/// Scanning stops at the first parity, checksum, or overrun error; packets
/// found before the error are still returned.
pub fn extract_packets_from_line(
    line: &[u16],
    search: ChannelSearch,
) -> Result<(Vec<Vec<u16>>, Vec<usize>)> {
    // (sample, original word offset) for the selected channel.
    let samples: Vec<(u16, usize)> = line
        .iter()
        .enumerate()
        .filter(|(i, _)| match search {
            ChannelSearch::Y => i % 2 == 1,
            ChannelSearch::C => i % 2 == 0,
            ChannelSearch::Both => true,
        })
        .map(|(i, w)| (*w & 0x3FF, i))
        .collect();

    let mut packets = Vec::new();
    let mut offsets = Vec::new();
    let mut i = 0;
    while i + 2 < samples.len() {
        if samples[i].0 != 0x000 || samples[i + 1].0 != 0x3FF || samples[i + 2].0 != 0x3FF {
            i += 1;
            continue;
        }
        // ADF found; need DID/SDID/DC before trusting the length.
        if i + 5 >= samples.len() {
            break;
        }
        let did = samples[i + 3].0;
        let sid = samples[i + 4].0;
        let dc_word = samples[i + 5].0;
        if !parity_ok(did) || !parity_ok(sid) || !parity_ok(dc_word) {
            tracing::debug!(offset = samples[i].1, "bad parity in packet header, line scan stopped");
            break;
        }
        let dc = usize::from(dc_word & 0xFF);
        let end = i + 6 + dc + 1; // one past the checksum word
        if end > samples.len() {
            tracing::debug!(offset = samples[i].1, dc, "packet overruns line, scan stopped");
            break;
        }

        let words: Vec<u16> = samples[i..end].iter().map(|(w, _)| *w).collect();
        let mut sum = 0u32;
        for w in &words[3..end - i - 1] {
            sum += u32::from(w & 0x1FF);
        }
        if (sum & 0x1FF) as u16 != words[end - i - 1] & 0x1FF {
            tracing::debug!(offset = samples[i].1, "bad checksum, line scan stopped");
            break;
        }

        offsets.push(samples[i].1);
        packets.push(words);
        i = end;
    }
    Ok((packets, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::AncPacket;

    /// Interleave packet words into the Y channel of a blanked line.
    fn line_with_packet_in_y(width: usize, words: &[u16], start_sample: usize) -> Vec<u16> {
        let mut line = vec![0x040u16; width * 2]; // blanking level
        for (n, w) in words.iter().enumerate() {
            line[(start_sample + n) * 2 + 1] = *w;
        }
        line
    }

    fn sample_words() -> Vec<u16> {
        let mut p = AncPacket::new();
        p.set_did_sid(0x61, 0x02);
        p.set_payload(&[0x80, 0x41, 0x42]);
        let mut words = Vec::new();
        p.generate_vanc_words(&mut words).unwrap();
        words
    }

    #[test]
    fn extracts_a_packet_from_the_luma_channel() {
        let words = sample_words();
        let line = line_with_packet_in_y(1920, &words, 4);
        let (packets, offsets) = extract_packets_from_line(&line, ChannelSearch::Y).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0], words);
        assert_eq!(offsets[0], 4 * 2 + 1);
        // Odd original offset discerns the luma channel.
        assert_eq!(offsets[0] % 2, 1);
    }

    #[test]
    fn chroma_search_misses_luma_packet() {
        let words = sample_words();
        let line = line_with_packet_in_y(1920, &words, 4);
        let (packets, _) = extract_packets_from_line(&line, ChannelSearch::C).unwrap();
        assert!(packets.is_empty());
    }

    #[test]
    fn two_packets_back_to_back() {
        let words = sample_words();
        let mut line = line_with_packet_in_y(1920, &words, 0);
        for (n, w) in words.iter().enumerate() {
            line[(words.len() + n) * 2 + 1] = *w;
        }
        let (packets, _) = extract_packets_from_line(&line, ChannelSearch::Y).unwrap();
        assert_eq!(packets.len(), 2);
    }

    #[test]
    fn stops_on_bad_checksum_but_keeps_earlier_packets() {
        let words = sample_words();
        let mut line = line_with_packet_in_y(1920, &words, 0);
        // Second packet with a corrupted checksum word.
        for (n, w) in words.iter().enumerate() {
            line[(words.len() + n) * 2 + 1] = *w;
        }
        let cs_index = (2 * words.len() - 1) * 2 + 1;
        line[cs_index] ^= 0x001;
        let (packets, _) = extract_packets_from_line(&line, ChannelSearch::Y).unwrap();
        assert_eq!(packets.len(), 1);
    }

    #[test]
    fn blank_line_has_no_packets() {
        let line = vec![0x040u16; 1920 * 2];
        let (packets, _) = extract_packets_from_line(&line, ChannelSearch::Y).unwrap();
        assert!(packets.is_empty());
    }

    #[test]
    fn raster_descriptor_rows() {
        let desc = RasterDescriptor {
            width: 1920,
            height: 1080,
            first_vanc_line: 9,
            first_active_line: 21,
            is_sd: false,
        };
        desc.validate().unwrap();
        assert_eq!(desc.vanc_line_count(), 12);
        assert_eq!(desc.vanc_row(9), Some(0));
        assert_eq!(desc.vanc_row(20), Some(11));
        assert_eq!(desc.vanc_row(21), None);
        assert_eq!(desc.vanc_row(8), None);
    }

    #[test]
    fn degenerate_raster_rejected() {
        let desc = RasterDescriptor {
            width: 0,
            height: 1080,
            first_vanc_line: 9,
            first_active_line: 21,
            is_sd: false,
        };
        assert!(matches!(desc.validate(), Err(AncError::Unsupported(_))));
    }

    #[test]
    fn parity_check_catches_flipped_bit() {
        let good = add_even_parity(0x41);
        assert!(parity_ok(good));
        assert!(!parity_ok(good ^ 0x100));
    }
}
