//! An ordered collection of ancillary packets for one video field/frame,
//! with receive pipelines (SDI capture stream, VANC line, RTP) and the
//! matching transmit pipelines.
//!
//! The list owns its packets: [`add`](AncillaryList::add) deep-clones, so
//! no packet is ever shared between two lists. Insertion order is kept
//! until one of the sorts is requested; sorting by location produces the
//! canonical playout order expected by the transmit paths.
//!
//! **Not thread-safe.** All operations are synchronous and the list holds
//! exclusive ownership of its state; hand a completed list to another
//! thread by moving it, never by sharing live references.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AncError, MalformedKind, Result};
use crate::factory;
use crate::location::{
    DataChannel, DataLink, DataSpace, DataStream, HORIZ_OFFSET_ANY_HANC, HORIZ_OFFSET_ANY_VANC,
    HORIZ_OFFSET_ANYWHERE, HORIZ_OFFSET_DEFAULT, PacketLocation,
};
use crate::packet::{AncPacket, DataCoding, GUMP_WRAPPER_SIZE};
use crate::packets::AncDataType;
use crate::rtp::{
    HEADER_BYTE_COUNT, HEADER_WORD_COUNT, MAX_PACKETS_PER_FIELD, MAX_PAYLOAD_BYTES_PER_FIELD,
    PayloadHeader,
};
use crate::vanc::{RasterDescriptor, VancIngestOptions};

/// Matches any DID in the lookup/count APIs.
pub const WILDCARD_DID: u8 = 0xFF;
/// Matches any SDID in the lookup/count APIs.
pub const WILDCARD_SID: u8 = 0xFF;

/// Default location assumed for packets in an SDI capture stream whose
/// header carries no location bits.
fn sdi_default_location() -> PacketLocation {
    PacketLocation::new(
        DataLink::A,
        DataStream::DS1,
        DataChannel::Y,
        DataSpace::Vanc,
        9,
        HORIZ_OFFSET_DEFAULT,
    )
}

/// Outcome of an RTP transmit: accepted and dropped packet tallies per
/// field. Drops are the caller-visible signal for ceiling overflow — the
/// call itself still succeeds and produces a valid (smaller) payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IpTransmitReport {
    pub f1_packets: usize,
    pub f2_packets: usize,
    pub f1_dropped: usize,
    pub f2_dropped: usize,
}

impl IpTransmitReport {
    pub fn dropped(&self) -> usize {
        self.f1_dropped + self.f2_dropped
    }
}

/// Outcome of a VANC raster transmit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VancTransmitReport {
    pub inserted: usize,
    pub failed: usize,
}

/// An ordered collection of [`AncPacket`]s for one field or frame.
#[derive(Clone)]
pub struct AncillaryList {
    packets: Vec<AncPacket>,
    /// line number -> type, used to classify ingested raw (analog) packets
    /// that are not self-describing.
    analog_type_map: BTreeMap<u16, AncDataType>,
    ignore_checksum_errors: bool,
}

impl Default for AncillaryList {
    fn default() -> Self {
        Self::new()
    }
}

impl AncillaryList {
    /// An empty list with the customary caption-line defaults in the
    /// analog type map (lines 20-22 and 283-285 carry line-21 captions).
    pub fn new() -> Self {
        let mut list = Self {
            packets: Vec::new(),
            analog_type_map: BTreeMap::new(),
            ignore_checksum_errors: false,
        };
        for line in [20, 21, 22, 283, 284, 285] {
            list.set_analog_type_for_line(line, AncDataType::Cea608Line21);
        }
        list
    }

    // --- Fetching, searching & enumerating ---

    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AncPacket> {
        self.packets.iter()
    }

    pub fn packet_at(&self, index: usize) -> Option<&AncPacket> {
        self.packets.get(index)
    }

    pub fn packet_at_mut(&mut self, index: usize) -> Option<&mut AncPacket> {
        self.packets.get_mut(index)
    }

    /// Number of packets with the given recognized type.
    pub fn count_with_type(&self, kind: AncDataType) -> usize {
        self.packets.iter().filter(|p| p.kind() == kind).count()
    }

    /// The `index`th packet (0-based) with the given recognized type.
    pub fn get_with_type(&self, kind: AncDataType, index: usize) -> Option<&AncPacket> {
        self.packets.iter().filter(|p| p.kind() == kind).nth(index)
    }

    fn id_matches(packet: &AncPacket, did: u8, sid: u8) -> bool {
        (did == WILDCARD_DID || did == packet.did())
            && (sid == WILDCARD_SID || sid == packet.sid())
    }

    /// Number of packets with the given DID/SDID. [`WILDCARD_DID`] /
    /// [`WILDCARD_SID`] match any value.
    pub fn count_with_id(&self, did: u8, sid: u8) -> usize {
        self.packets
            .iter()
            .filter(|p| Self::id_matches(p, did, sid))
            .count()
    }

    /// The `index`th packet (0-based) matching the given DID/SDID,
    /// wildcards allowed.
    pub fn get_with_id(&self, did: u8, sid: u8, index: usize) -> Option<&AncPacket> {
        self.packets
            .iter()
            .filter(|p| Self::id_matches(p, did, sid))
            .nth(index)
    }

    // --- Adding & removing ---

    /// Append a deep copy of `packet`. The caller keeps the original; the
    /// list owns the clone.
    pub fn add(&mut self, packet: &AncPacket) {
        self.packets.push(packet.clone());
    }

    /// Take the packet at `index` out of the list without dropping it; the
    /// caller decides its disposal. Out-of-range is a no-op returning
    /// `None`.
    pub fn remove_at(&mut self, index: usize) -> Option<AncPacket> {
        (index < self.packets.len()).then(|| self.packets.remove(index))
    }

    /// Remove and drop the packet at `index`. Out-of-range is a no-op.
    pub fn delete_at(&mut self, index: usize) {
        let _ = self.remove_at(index);
    }

    /// Remove and drop every packet.
    pub fn clear(&mut self) {
        self.packets.clear();
    }

    // --- Operations ---

    /// Stable sort by DID.
    pub fn sort_by_did(&mut self) {
        self.packets.sort_by_key(|p| p.did());
    }

    /// Stable sort by SDID.
    pub fn sort_by_sid(&mut self) {
        self.packets.sort_by_key(|p| p.sid());
    }

    /// Stable sort into canonical playout order (see
    /// [`PacketLocation::ordinal`]). Run this before any transmit path.
    pub fn sort_by_location(&mut self) {
        self.packets.sort_by_key(|p| p.location().ordinal());
    }

    /// Parse every packet's payload. All packets are parsed even when some
    /// fail; the last failure is returned.
    pub fn parse_all(&mut self) -> Result<()> {
        let mut result = Ok(());
        for packet in &mut self.packets {
            if let Err(e) = packet.parse_payload() {
                result = Err(e);
            }
        }
        result
    }

    /// Whether RTP ingest verifies each packet's embedded checksum.
    pub fn set_ignore_checksum_errors(&mut self, ignore: bool) {
        self.ignore_checksum_errors = ignore;
    }

    /// Pairwise comparison with another list, by current index.
    ///
    /// Packet counts must match, and packet `i` of `self` is compared with
    /// packet `i` of `other` — two lists holding the same packets in
    /// different orders compare unequal, so sort both the same way first.
    pub fn compare(
        &self,
        other: &AncillaryList,
        ignore_location: bool,
        ignore_checksum: bool,
    ) -> Result<()> {
        if self.len() != other.len() {
            return Err(AncError::PacketsDiffer(format!(
                "packet counts differ: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        let mut diffs = Vec::new();
        for (i, (a, b)) in self.packets.iter().zip(&other.packets).enumerate() {
            if let Err(e) = a.compare(b, ignore_location, ignore_checksum) {
                diffs.push(format!("packet {i}: {e}"));
            }
        }
        if diffs.is_empty() {
            Ok(())
        } else {
            Err(AncError::PacketsDiffer(diffs.join("\n")))
        }
    }

    // --- Analog type map ---

    /// Associate a frame line with an analog data type. `Unknown` erases
    /// the entry (a non-entry and `Unknown` are equivalent).
    pub fn set_analog_type_for_line(&mut self, line: u16, kind: AncDataType) {
        self.analog_type_map.remove(&line);
        if kind != AncDataType::Unknown {
            self.analog_type_map.insert(line, kind);
        }
    }

    /// The type associated with a frame line, or `Unknown`.
    pub fn analog_type_for_line(&self, line: u16) -> AncDataType {
        self.analog_type_map
            .get(&line)
            .copied()
            .unwrap_or(AncDataType::Unknown)
    }

    pub fn clear_analog_type_map(&mut self) {
        self.analog_type_map.clear();
    }

    /// Replace the whole map. Entries mapping to `Unknown` are not stored.
    pub fn set_analog_type_map(&mut self, map: BTreeMap<u16, AncDataType>) {
        self.analog_type_map = map
            .into_iter()
            .filter(|(_, kind)| *kind != AncDataType::Unknown)
            .collect();
    }

    pub fn analog_type_map(&self) -> &BTreeMap<u16, AncDataType> {
        &self.analog_type_map
    }

    // --- Receive: SDI capture stream ---

    /// Parse a raw SDI capture buffer into packets and append them.
    ///
    /// Packets are sliced out one at a time. Digital packets are classified
    /// via the recognizer chain immediately. Raw (analog) packets that
    /// directly continue the list's last packet — same raw coding and an
    /// identical location — are merged into it (extractor hardware breaks
    /// digitized lines into multiple packets); otherwise the analog type
    /// map classifies them by line number.
    ///
    /// On the first malformed packet the entire remaining buffer is
    /// abandoned — there is no resynchronization — and the error is
    /// returned. Packets already appended stay in the list.
    pub fn add_received_bytes(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Err(AncError::NullInput);
        }
        let default_location = sdi_default_location();
        let mut offset = 0;
        let mut added = 0;
        while offset < buf.len() {
            let mut packet = AncPacket::new();
            let consumed = match packet.init_from_received_bytes(&buf[offset..], &default_location)
            {
                Ok(0) => break,
                Ok(n) => n,
                // TODO: someday try to recover the scan past a bad packet.
                Err(e) => {
                    tracing::warn!(
                        offset,
                        remaining = buf.len() - offset,
                        error = %e,
                        "malformed packet, abandoning remainder of SDI scan"
                    );
                    return Err(e);
                }
            };
            offset += consumed;

            match packet.coding() {
                DataCoding::Digital => {
                    let kind = factory::guess_type(&packet);
                    if let Some(p) = factory::create(kind, Some(&packet)) {
                        self.packets.push(p);
                        added += 1;
                    }
                }
                DataCoding::Raw => {
                    let continuation = self.packets.last().is_some_and(|prev| {
                        prev.is_raw() && prev.location() == packet.location()
                    });
                    if continuation {
                        // Another slice of the same digitized line.
                        self.packets
                            .last_mut()
                            .expect("continuation implies a last packet")
                            .append_payload_from(&packet);
                    } else {
                        let kind = self.analog_type_for_line(packet.location().line_number());
                        if let Some(p) = factory::create(kind, Some(&packet)) {
                            self.packets.push(p);
                            added += 1;
                        }
                    }
                }
            }
        }
        tracing::debug!(added, bytes = buf.len(), "SDI anc buffer ingested");
        Ok(added)
    }

    // --- Receive: VANC line ---

    /// Append the packet contained in the raw 16-bit words of a VANC line.
    ///
    /// `words` must start with the `0x000 0x3FF 0x3FF` preamble, followed
    /// by DID, SDID, DC, the data words and the checksum word; the upper
    /// byte of every word is masked off. `location` supplies where the
    /// packet was found. Zero-payload packets are excluded unless
    /// `options.include_zero_length` is set.
    ///
    /// Returns the number of packets appended (0 or 1).
    pub fn add_vanc_data(
        &mut self,
        words: &[u16],
        location: &PacketLocation,
        options: &VancIngestOptions,
    ) -> Result<usize> {
        if words.len() < GUMP_WRAPPER_SIZE {
            return Err(AncError::Malformed {
                kind: MalformedKind::TruncatedPacket,
            });
        }
        if words[0] & 0x3FF != 0x000 || words[1] & 0x3FF != 0x3FF || words[2] & 0x3FF != 0x3FF {
            return Err(AncError::Malformed {
                kind: MalformedKind::BadAncPreamble,
            });
        }

        // Re-wrap as a one-packet SDI capture image so one parser owns the
        // header semantics.
        let line = location.line_number();
        let mut gump = Vec::with_capacity(words.len());
        gump.push(0xFF);
        let mut b1 = 0x80 | ((line >> 7) & 0x0F) as u8;
        if location.channel() == DataChannel::Y {
            b1 |= 0x20;
        }
        gump.push(b1);
        gump.push((line & 0x7F) as u8);
        for word in &words[3..] {
            gump.push((word & 0xFF) as u8);
        }

        let mut packet = AncPacket::new();
        packet.init_from_received_bytes(&gump, location)?;

        if packet.is_empty() && !options.include_zero_length {
            tracing::debug!(line, "zero-length VANC packet excluded");
            return Ok(0);
        }

        let kind = factory::guess_type(&packet);
        match factory::create(kind, Some(&packet)) {
            Some(p) => {
                self.packets.push(p);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    // --- Transmit: SDI capture stream ---

    /// Buffer sizes needed by [`get_sdi_transmit_data`](Self::get_sdi_transmit_data),
    /// bucketed by field. For progressive frames everything lands in
    /// field 1 and `f2_start_line` is ignored.
    pub fn transmit_size(&self, progressive: bool, f2_start_line: u16) -> (usize, usize) {
        let mut f1 = 0;
        let mut f2 = 0;
        for p in &self.packets {
            let size = p.raw_packet_size();
            if progressive || p.location().line_number() < f2_start_line {
                f1 += size;
            } else {
                f2 += size;
            }
        }
        (f1, f2)
    }

    /// Serialize every packet into the SDI capture stream format, each into
    /// the field buffer its line number selects.
    ///
    /// Packets are emitted in their current order — sort by location first
    /// for canonical playout order. Fails with
    /// [`AncError::BufferTooSmall`] if any packet would overflow its target
    /// buffer; the unused remainder of both buffers is zeroed on success.
    pub fn get_sdi_transmit_data(
        &self,
        f1: &mut [u8],
        f2: &mut [u8],
        progressive: bool,
        f2_start_line: u16,
    ) -> Result<()> {
        let mut f1_offset = 0;
        let mut f2_offset = 0;
        for p in &self.packets {
            if progressive || p.location().line_number() < f2_start_line {
                f1_offset += p.generate_transmit_bytes(&mut f1[f1_offset..])?;
            } else {
                f2_offset += p.generate_transmit_bytes(&mut f2[f2_offset..])?;
            }
        }
        f1[f1_offset..].fill(0);
        f2[f2_offset..].fill(0);
        Ok(())
    }

    // --- Transmit: VANC raster ---

    /// Patch every packet into the VANC region of a component-word frame
    /// buffer.
    ///
    /// Digital packets are encoded as 10-bit words and written into the
    /// Y or C sub-channel of their exact line (HD), or muxed across both
    /// (SD). Raw packets overwrite their entire line verbatim, but only
    /// when no digital packet already claimed that line.
    ///
    /// Per-packet failures (line overrun, claimed line) are tallied, not
    /// fatal: the call fails only if nothing succeeded while something
    /// failed.
    pub fn get_vanc_transmit_data(
        &self,
        frame: &mut [u16],
        desc: &RasterDescriptor,
    ) -> Result<VancTransmitReport> {
        desc.validate()?;
        let wpl = desc.words_per_line();
        let needed = wpl * desc.vanc_line_count();
        if frame.len() < needed {
            return Err(AncError::BufferTooSmall {
                needed: needed * 2,
                capacity: frame.len() * 2,
            });
        }

        let mut report = VancTransmitReport::default();
        for row in 0..desc.vanc_line_count() {
            let smpte_line = desc.first_vanc_line + row as u16;
            let line = &mut frame[row * wpl..(row + 1) * wpl];
            let mut digital_claimed = false;

            for p in self.packets.iter().filter(|p| {
                p.is_digital() && p.location().line_number() == smpte_line && !p.location().is_hanc()
            }) {
                let mut words = Vec::new();
                if p.generate_vanc_words(&mut words).is_err() {
                    report.failed += 1;
                    continue;
                }
                let start = normalized_offset(p.location().horiz_offset());
                let written = if desc.is_sd {
                    write_muxed(line, start, &words)
                } else {
                    write_channel(line, p.location().channel(), start, &words)
                };
                if written {
                    report.inserted += 1;
                    digital_claimed = true;
                } else {
                    tracing::warn!(
                        line = smpte_line,
                        words = words.len(),
                        "packet does not fit its VANC line"
                    );
                    report.failed += 1;
                }
            }

            for p in self
                .packets
                .iter()
                .filter(|p| p.is_raw() && p.location().line_number() == smpte_line)
            {
                if digital_claimed {
                    tracing::warn!(line = smpte_line, "line already claimed by digital packet");
                    report.failed += 1;
                    continue;
                }
                let n = p.payload().len().min(wpl);
                for (i, b) in p.payload()[..n].iter().enumerate() {
                    line[i] = u16::from(*b);
                }
                report.inserted += 1;
            }
        }

        if report.inserted == 0 && report.failed > 0 {
            Err(AncError::InsertionFailed {
                failed: report.failed,
            })
        } else {
            Ok(report)
        }
    }

    // --- Transmit: IP/RTP ---

    /// Byte counts of the RTP payloads [`get_ip_transmit_data`](Self::get_ip_transmit_data)
    /// would produce (header included), with the wire ceilings applied.
    pub fn ip_transmit_size(&self, progressive: bool, f2_start_line: u16) -> (usize, usize) {
        let (w1, _, _) = self.build_rtp_field(progressive, f2_start_line, false);
        let f1 = HEADER_BYTE_COUNT + w1.len() * 4;
        if progressive {
            (f1, 0)
        } else {
            let (w2, _, _) = self.build_rtp_field(progressive, f2_start_line, true);
            (f1, HEADER_BYTE_COUNT + w2.len() * 4)
        }
    }

    /// Serialize the digital packets into one RTP anc payload per field.
    ///
    /// Non-digital packets are silently skipped (RTP anc carriage is
    /// digital-only). Two hard wire limits are enforced per field:
    /// [`MAX_PACKETS_PER_FIELD`] and [`MAX_PAYLOAD_BYTES_PER_FIELD`]. A
    /// packet that would exceed either limit is dropped — its partial words
    /// rolled back — and counted in the report; the call still succeeds and
    /// produces a valid payload for the packets that fit.
    ///
    /// Each output buffer is replaced with the payload header (length and
    /// count reflecting what was actually accepted) followed by the packet
    /// words in network byte order. For progressive frames the field 2
    /// buffer is left empty.
    pub fn get_ip_transmit_data(
        &self,
        f1: &mut Vec<u8>,
        f2: &mut Vec<u8>,
        progressive: bool,
        f2_start_line: u16,
    ) -> Result<IpTransmitReport> {
        let mut report = IpTransmitReport::default();

        let (words, count, dropped) = self.build_rtp_field(progressive, f2_start_line, false);
        report.f1_packets = count;
        report.f1_dropped = dropped;
        write_rtp_buffer(f1, &words, count, progressive, false);

        f2.clear();
        if !progressive {
            let (words, count, dropped) = self.build_rtp_field(progressive, f2_start_line, true);
            report.f2_packets = count;
            report.f2_dropped = dropped;
            write_rtp_buffer(f2, &words, count, progressive, true);
        }

        if report.dropped() > 0 {
            tracing::warn!(
                f1_dropped = report.f1_dropped,
                f2_dropped = report.f2_dropped,
                "packets dropped at RTP wire ceiling"
            );
        }
        Ok(report)
    }

    fn build_rtp_field(
        &self,
        progressive: bool,
        f2_start_line: u16,
        field2: bool,
    ) -> (Vec<u32>, usize, usize) {
        let mut words = Vec::new();
        let mut count = 0;
        let mut dropped = 0;
        for p in &self.packets {
            if !p.is_digital() {
                tracing::trace!(packet = %p, "non-digital packet skipped for RTP");
                continue;
            }
            let in_field2 = !progressive && p.location().line_number() >= f2_start_line;
            if in_field2 != field2 {
                continue;
            }
            let start = words.len();
            let accepted = p.generate_rtp_words(&mut words).is_ok()
                && count < MAX_PACKETS_PER_FIELD
                && words.len() * 4 <= MAX_PAYLOAD_BYTES_PER_FIELD;
            if accepted {
                count += 1;
            } else {
                words.truncate(start);
                dropped += 1;
            }
        }
        (words, count, dropped)
    }

    // --- Receive: IP/RTP ---

    /// Parse one RTP anc payload (header plus packets, in network-order
    /// 32-bit words) and append its packets.
    ///
    /// A NULL (all-zero) header means "nothing to add" and succeeds with
    /// zero packets. A structurally invalid header is a hard failure, as is
    /// a buffer shorter than the header's declared payload length — checked
    /// before any packet parsing begins. Returns the number of packets
    /// appended.
    pub fn add_received_rtp(&mut self, words: &[u32]) -> Result<usize> {
        let header = PayloadHeader::read_from_words(words)?;
        if header.is_null() {
            tracing::debug!("NULL RTP header, nothing to add");
            return Ok(0);
        }
        if !header.is_valid() {
            return Err(AncError::Malformed {
                kind: MalformedKind::BadRtpHeader,
            });
        }
        let declared = usize::from(header.payload_length());
        let available = (words.len() - HEADER_WORD_COUNT) * 4;
        if available < declared {
            return Err(AncError::BufferTooSmall {
                needed: declared,
                capacity: available,
            });
        }

        let mut index = HEADER_WORD_COUNT;
        let mut added = 0;
        for _ in 0..header.anc_count() {
            let mut packet = AncPacket::new();
            packet.init_from_rtp_words(words, &mut index, self.ignore_checksum_errors)?;
            let kind = factory::guess_type(&packet);
            if let Some(p) = factory::create(kind, Some(&packet)) {
                self.packets.push(p);
                added += 1;
            }
        }
        tracing::debug!(added, "RTP anc payload ingested");
        Ok(added)
    }
}

/// Map the horizontal-offset sentinels to "start of line".
fn normalized_offset(horiz_offset: u16) -> usize {
    match horiz_offset {
        HORIZ_OFFSET_ANY_VANC | HORIZ_OFFSET_ANY_HANC | HORIZ_OFFSET_ANYWHERE => 0,
        h => usize::from(h),
    }
}

/// Write packet words into one sub-channel of an interleaved HD line.
/// Returns false (without writing) when the packet would overrun the line.
fn write_channel(line: &mut [u16], channel: DataChannel, start: usize, words: &[u16]) -> bool {
    let lane = usize::from(channel == DataChannel::Y);
    if words.is_empty() {
        return true;
    }
    let last = (start + words.len() - 1) * 2 + lane;
    if last >= line.len() {
        return false;
    }
    for (n, w) in words.iter().enumerate() {
        line[(start + n) * 2 + lane] = *w;
    }
    true
}

/// Write packet words contiguously across both channels of an SD line.
fn write_muxed(line: &mut [u16], start: usize, words: &[u16]) -> bool {
    if start + words.len() > line.len() {
        return false;
    }
    line[start..start + words.len()].copy_from_slice(words);
    true
}

fn write_rtp_buffer(out: &mut Vec<u8>, words: &[u32], count: usize, progressive: bool, field2: bool) {
    let mut header = PayloadHeader::new();
    if progressive {
        header.set_progressive();
    } else if field2 {
        header.set_field2();
    } else {
        header.set_field1();
    }
    header
        .set_end_of_field_or_frame(true)
        .set_payload_length((words.len() * 4) as u16)
        .set_anc_count(count as u8);

    out.clear();
    header.write_to_bytes(out);
    for word in words {
        out.extend_from_slice(&word.to_be_bytes());
    }
}

impl fmt::Display for AncillaryList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AncillaryList: {} pkts:", self.len())?;
        for (i, packet) in self.packets.iter().enumerate() {
            writeln!(f, "## Packet {}: {}", i + 1, packet)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::HORIZ_OFFSET_DEFAULT;

    fn digital_packet(did: u8, sid: u8, line: u16, payload: &[u8]) -> AncPacket {
        let mut p = AncPacket::new();
        p.set_did_sid(did, sid);
        p.set_payload(payload);
        p.set_location(PacketLocation::new(
            DataLink::A,
            DataStream::DS1,
            DataChannel::Y,
            DataSpace::Vanc,
            line,
            HORIZ_OFFSET_DEFAULT,
        ));
        p
    }

    fn raw_packet(line: u16, payload: &[u8]) -> AncPacket {
        let mut p = digital_packet(0x00, 0x00, line, payload);
        p.set_data_coding(DataCoding::Raw);
        p
    }

    // --- Collection basics ---

    #[test]
    fn add_clones_the_packet() {
        let mut list = AncillaryList::new();
        let mut p = digital_packet(0x61, 0x01, 9, &[1, 2]);
        list.add(&p);
        p.set_payload(&[9, 9, 9]); // the caller's copy is independent
        assert_eq!(list.packet_at(0).unwrap().payload(), &[1, 2]);
    }

    #[test]
    fn remove_at_hands_back_ownership() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1]));
        let taken = list.remove_at(0).unwrap();
        assert_eq!(taken.did(), 0x61);
        assert!(list.is_empty());
        // Out-of-range removal is a no-op success.
        assert!(list.remove_at(5).is_none());
        list.delete_at(5);
    }

    #[test]
    fn wildcard_id_lookup() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1]));
        list.add(&digital_packet(0x61, 0x02, 10, &[2, 3, 4]));
        list.add(&digital_packet(0x60, 0x60, 11, &[0; 16]));

        assert_eq!(list.count_with_id(WILDCARD_DID, WILDCARD_SID), 3);
        assert_eq!(list.count_with_id(0x61, WILDCARD_SID), 2);
        assert_eq!(list.count_with_id(0x61, 0x02), 1);
        assert_eq!(list.get_with_id(0x61, WILDCARD_SID, 1).unwrap().sid(), 0x02);
        assert!(list.get_with_id(0x61, WILDCARD_SID, 2).is_none());
    }

    #[test]
    fn sort_by_location_is_canonical_and_idempotent() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x10, 0x01, 21, &[1]));
        list.add(&digital_packet(0x20, 0x01, 9, &[2]));
        list.add(&digital_packet(0x30, 0x01, 16, &[3]));
        list.sort_by_location();
        let lines: Vec<u16> = list.iter().map(|p| p.location().line_number()).collect();
        assert_eq!(lines, vec![9, 16, 21]);

        list.sort_by_location();
        let again: Vec<u16> = list.iter().map(|p| p.location().line_number()).collect();
        assert_eq!(again, vec![9, 16, 21]);
    }

    #[test]
    fn sort_by_did_is_stable() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1]));
        list.add(&digital_packet(0x61, 0x02, 10, &[2]));
        list.add(&digital_packet(0x45, 0x01, 11, &[3]));
        list.sort_by_did();
        assert_eq!(list.packet_at(0).unwrap().did(), 0x45);
        // Equal DIDs keep their relative order.
        assert_eq!(list.packet_at(1).unwrap().sid(), 0x01);
        assert_eq!(list.packet_at(2).unwrap().sid(), 0x02);
    }

    // --- Analog type map ---

    #[test]
    fn analog_map_defaults_cover_caption_lines() {
        let list = AncillaryList::new();
        for line in [20, 21, 22, 283, 284, 285] {
            assert_eq!(list.analog_type_for_line(line), AncDataType::Cea608Line21);
        }
        assert_eq!(list.analog_type_for_line(100), AncDataType::Unknown);
    }

    #[test]
    fn analog_map_unknown_erases() {
        let mut list = AncillaryList::new();
        list.set_analog_type_for_line(21, AncDataType::Unknown);
        assert_eq!(list.analog_type_for_line(21), AncDataType::Unknown);
        assert!(!list.analog_type_map().contains_key(&21));
    }

    #[test]
    fn analog_map_replacement_filters_unknown() {
        let mut list = AncillaryList::new();
        let mut map = BTreeMap::new();
        map.insert(14, AncDataType::TimecodeVitc);
        map.insert(21, AncDataType::Unknown);
        list.set_analog_type_map(map);
        assert_eq!(list.analog_type_map().len(), 1);
        assert_eq!(list.analog_type_for_line(14), AncDataType::TimecodeVitc);
    }

    // --- SDI receive ---

    fn gump_image(packets: &[&AncPacket]) -> Vec<u8> {
        let mut buf = Vec::new();
        for p in packets {
            let mut chunk = vec![0u8; p.raw_packet_size()];
            p.generate_transmit_bytes(&mut chunk).unwrap();
            buf.extend_from_slice(&chunk);
        }
        buf
    }

    #[test]
    fn receive_n_concatenated_packets_yields_n_entries() {
        let a = digital_packet(0x61, 0x01, 9, &[0x96, 0x69]);
        let b = digital_packet(0x60, 0x60, 10, &[0u8; 16]);
        let c = digital_packet(0x12, 0x34, 11, &[1, 2, 3]);
        let buf = gump_image(&[&a, &b, &c]);

        let mut list = AncillaryList::new();
        assert_eq!(list.add_received_bytes(&buf).unwrap(), 3);
        list.packet_at(0).unwrap().compare(&a, false, true).unwrap();
        list.packet_at(1).unwrap().compare(&b, false, true).unwrap();
        list.packet_at(2).unwrap().compare(&c, false, true).unwrap();
        // Classification ran during ingest.
        assert_eq!(list.packet_at(0).unwrap().kind(), AncDataType::Cea708);
        assert_eq!(list.packet_at(1).unwrap().kind(), AncDataType::TimecodeAtc);
        assert_eq!(list.packet_at(2).unwrap().kind(), AncDataType::Unknown);
    }

    #[test]
    fn receive_abandons_scan_on_garbage() {
        // Known limitation: no resynchronization after a malformed packet,
        // even though a valid packet follows the garbage.
        let a = digital_packet(0x61, 0x01, 9, &[1, 2]);
        let b = digital_packet(0x61, 0x02, 10, &[3, 4, 5]);
        let mut buf = gump_image(&[&a]);
        buf.extend_from_slice(&[0xAB; 8]); // not a packet
        buf.extend_from_slice(&gump_image(&[&b]));

        let mut list = AncillaryList::new();
        assert!(list.add_received_bytes(&buf).is_err());
        assert_eq!(list.len(), 1); // the packet before the garbage survives
    }

    #[test]
    fn receive_merges_raw_continuations() {
        let first = raw_packet(21, &[1, 2, 3]);
        let second = raw_packet(21, &[4, 5]);
        let other_line = raw_packet(284, &[6]);
        let buf = gump_image(&[&first, &second, &other_line]);

        let mut list = AncillaryList::new();
        assert_eq!(list.add_received_bytes(&buf).unwrap(), 2);
        assert_eq!(list.len(), 2);
        assert_eq!(list.packet_at(0).unwrap().payload(), &[1, 2, 3, 4, 5]);
        assert_eq!(list.packet_at(1).unwrap().payload(), &[6]);
        // Both classified off the analog type map.
        assert_eq!(list.packet_at(0).unwrap().kind(), AncDataType::Cea608Line21);
    }

    #[test]
    fn receive_empty_buffer_is_null_input() {
        let mut list = AncillaryList::new();
        assert!(matches!(
            list.add_received_bytes(&[]),
            Err(AncError::NullInput)
        ));
    }

    // --- SDI transmit ---

    #[test]
    fn transmit_size_buckets_by_field() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1, 2])); // field 1
        list.add(&digital_packet(0x61, 0x01, 600, &[1, 2, 3])); // field 2
        let (f1, f2) = list.transmit_size(false, 564);
        assert_eq!(f1, 2 + 7);
        assert_eq!(f2, 3 + 7);

        // Progressive: everything in field 1.
        let (f1, f2) = list.transmit_size(true, 564);
        assert_eq!(f1, 2 + 7 + 3 + 7);
        assert_eq!(f2, 0);
    }

    #[test]
    fn sdi_transmit_overflows_are_fatal() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1, 2, 3]));
        let mut f1 = [0u8; 4];
        let mut f2 = [0u8; 0];
        assert!(matches!(
            list.get_sdi_transmit_data(&mut f1, &mut f2, true, 0),
            Err(AncError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn sdi_transmit_zeroes_the_remainder() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1]));
        let mut f1 = [0xEEu8; 32];
        let mut f2 = [0xEEu8; 8];
        list.get_sdi_transmit_data(&mut f1, &mut f2, true, 0).unwrap();
        assert_eq!(f1[0], 0xFF);
        assert!(f1[8..].iter().all(|b| *b == 0));
        assert!(f2.iter().all(|b| *b == 0));
    }

    // --- RTP transmit & receive ---

    #[test]
    fn rtp_round_trip_through_byte_buffers() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[0x96, 0x69, 0x55]));
        list.add(&digital_packet(0x60, 0x60, 10, &[0u8; 16]));

        let mut f1 = Vec::new();
        let mut f2 = Vec::new();
        let report = list.get_ip_transmit_data(&mut f1, &mut f2, true, 0).unwrap();
        assert_eq!(report.f1_packets, 2);
        assert_eq!(report.dropped(), 0);
        assert!(f2.is_empty());
        assert_eq!(f1.len(), list.ip_transmit_size(true, 0).0);

        // Bytes back to words, then re-ingest.
        let words: Vec<u32> = f1
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let mut rx = AncillaryList::new();
        assert_eq!(rx.add_received_rtp(&words).unwrap(), 2);
        rx.compare(&list, true, true).unwrap();
    }

    #[test]
    fn rtp_non_digital_packets_skipped_silently() {
        let mut list = AncillaryList::new();
        list.add(&raw_packet(21, &[1, 2]));
        list.add(&digital_packet(0x61, 0x01, 9, &[5]));
        let mut f1 = Vec::new();
        let mut f2 = Vec::new();
        let report = list.get_ip_transmit_data(&mut f1, &mut f2, true, 0).unwrap();
        assert_eq!(report.f1_packets, 1);
        assert_eq!(report.dropped(), 0); // skipped, not dropped
    }

    #[test]
    fn rtp_null_header_adds_nothing() {
        let mut list = AncillaryList::new();
        assert_eq!(list.add_received_rtp(&[0u32; 5]).unwrap(), 0);
    }

    #[test]
    fn rtp_invalid_header_is_fatal() {
        let mut list = AncillaryList::new();
        // Version 1 instead of 2.
        let words = [1u32 << 30, 0, 0, 0, 0];
        assert!(matches!(
            list.add_received_rtp(&words),
            Err(AncError::Malformed {
                kind: MalformedKind::BadRtpHeader
            })
        ));
    }

    #[test]
    fn rtp_short_buffer_fails_before_parsing() {
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 9, &[1, 2, 3]));
        let mut f1 = Vec::new();
        let mut f2 = Vec::new();
        list.get_ip_transmit_data(&mut f1, &mut f2, true, 0).unwrap();
        let mut words: Vec<u32> = f1
            .chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        words.truncate(HEADER_WORD_COUNT); // header intact, payload gone

        let mut rx = AncillaryList::new();
        assert!(matches!(
            rx.add_received_rtp(&words),
            Err(AncError::BufferTooSmall { .. })
        ));
        assert!(rx.is_empty());
    }

    // --- VANC receive ---

    #[test]
    fn vanc_preamble_required() {
        let mut list = AncillaryList::new();
        let words = [0x123u16, 0x3FF, 0x3FF, 0x61, 0x02, 0x00, 0x63];
        let err = list
            .add_vanc_data(&words, &sdi_default_location(), &VancIngestOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AncError::Malformed {
                kind: MalformedKind::BadAncPreamble
            }
        ));
        assert!(list.is_empty());
    }

    #[test]
    fn vanc_ingest_classifies_and_appends() {
        let p = digital_packet(0x61, 0x02, 12, &[0x80, 0x41, 0x42]);
        let mut words = Vec::new();
        p.generate_vanc_words(&mut words).unwrap();

        let mut list = AncillaryList::new();
        let mut loc = sdi_default_location();
        loc.set_line_number(12);
        let added = list
            .add_vanc_data(&words, &loc, &VancIngestOptions::default())
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(list.packet_at(0).unwrap().kind(), AncDataType::Cea608Vanc);
        assert_eq!(list.packet_at(0).unwrap().payload(), &[0x80, 0x41, 0x42]);
        assert_eq!(list.packet_at(0).unwrap().location().line_number(), 12);
    }

    #[test]
    fn vanc_zero_length_excluded_by_default() {
        let p = digital_packet(0x61, 0x05, 10, &[]);
        let mut words = Vec::new();
        p.generate_vanc_words(&mut words).unwrap();

        let mut list = AncillaryList::new();
        let added = list
            .add_vanc_data(&words, &sdi_default_location(), &VancIngestOptions::default())
            .unwrap();
        assert_eq!(added, 0);
        assert!(list.is_empty());

        let opts = VancIngestOptions {
            include_zero_length: true,
        };
        assert_eq!(
            list.add_vanc_data(&words, &sdi_default_location(), &opts)
                .unwrap(),
            1
        );
    }

    // --- VANC transmit ---

    fn hd_raster() -> RasterDescriptor {
        RasterDescriptor {
            width: 1920,
            height: 1080,
            first_vanc_line: 9,
            first_active_line: 21,
            is_sd: false,
        }
    }

    #[test]
    fn vanc_transmit_patches_luma_channel() {
        let desc = hd_raster();
        let mut frame = vec![0u16; desc.words_per_line() * desc.vanc_line_count()];
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 10, &[0xAA]));
        let report = list.get_vanc_transmit_data(&mut frame, &desc).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.failed, 0);

        // Line 10 is row 1; Y channel = odd word indices, ADF at samples 0..3.
        let row = &frame[desc.words_per_line()..2 * desc.words_per_line()];
        assert_eq!(row[1], 0x000);
        assert_eq!(row[3], 0x3FF);
        assert_eq!(row[5], 0x3FF);
        assert_eq!(row[0], 0); // chroma untouched
    }

    #[test]
    fn vanc_transmit_raw_skipped_when_line_claimed() {
        let desc = hd_raster();
        let mut frame = vec![0u16; desc.words_per_line() * desc.vanc_line_count()];
        let mut list = AncillaryList::new();
        list.add(&digital_packet(0x61, 0x01, 10, &[0xAA]));
        list.add(&raw_packet(10, &[1, 2, 3]));
        let report = list.get_vanc_transmit_data(&mut frame, &desc).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn vanc_transmit_raw_overwrites_unclaimed_line() {
        let desc = hd_raster();
        let mut frame = vec![0x040u16; desc.words_per_line() * desc.vanc_line_count()];
        let mut list = AncillaryList::new();
        list.add(&raw_packet(9, &[1, 2, 3]));
        let report = list.get_vanc_transmit_data(&mut frame, &desc).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(&frame[..3], &[1, 2, 3]);
    }

    #[test]
    fn vanc_transmit_nothing_inserted_is_error() {
        let desc = hd_raster();
        let mut frame = vec![0u16; desc.words_per_line() * desc.vanc_line_count()];
        let mut list = AncillaryList::new();
        // Oversized packet cannot be encoded.
        list.add(&digital_packet(0x61, 0x01, 10, &vec![0u8; 300]));
        assert!(matches!(
            list.get_vanc_transmit_data(&mut frame, &desc),
            Err(AncError::InsertionFailed { failed: 1 })
        ));
    }

    #[test]
    fn vanc_transmit_frame_too_small() {
        let desc = hd_raster();
        let mut frame = vec![0u16; 16];
        let list = AncillaryList::new();
        assert!(matches!(
            list.get_vanc_transmit_data(&mut frame, &desc),
            Err(AncError::BufferTooSmall { .. })
        ));
    }

    // --- Compare ---

    #[test]
    fn compare_requires_equal_counts() {
        let mut a = AncillaryList::new();
        let b = AncillaryList::new();
        a.add(&digital_packet(0x61, 0x01, 9, &[1]));
        let err = a.compare(&b, true, true).unwrap_err();
        assert!(err.to_string().contains("counts differ"));
    }

    #[test]
    fn compare_is_pairwise_by_index() {
        let mut a = AncillaryList::new();
        let mut b = AncillaryList::new();
        a.add(&digital_packet(0x61, 0x01, 9, &[1]));
        a.add(&digital_packet(0x61, 0x02, 10, &[2]));
        // Same packets, swapped order: unequal by contract.
        b.add(&digital_packet(0x61, 0x02, 10, &[2]));
        b.add(&digital_packet(0x61, 0x01, 9, &[1]));
        assert!(a.compare(&b, true, true).is_err());

        b.sort_by_sid();
        a.compare(&b, true, true).unwrap();
    }

    #[test]
    fn parse_all_continues_past_failures() {
        let mut list = AncillaryList::new();
        // A 708 packet with an empty payload fails to parse...
        let mut bad = digital_packet(0x61, 0x01, 9, &[]);
        bad.set_kind(AncDataType::Cea708);
        list.add(&bad);
        // ...but the valid one after it still gets parsed.
        let mut good = digital_packet(0x61, 0x01, 10, &[0x96, 0x69]);
        good.set_kind(AncDataType::Cea708);
        list.add(&good);

        assert!(list.parse_all().is_err());
        assert!(!list.packet_at(0).unwrap().parsed_valid());
        assert!(list.packet_at(1).unwrap().parsed_valid());
    }
}
