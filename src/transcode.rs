//! Fixed-layout binary transcoding of a `.dbf` buffer.
//!
//! The output buffer is always byte-for-byte the same length as the input:
//! header and non-text bytes are copied verbatim, and only the 11-byte
//! descriptor name slots and the text-field slots of each record are
//! rewritten.  A rewrite that would not fit its fixed-width slot keeps the
//! original bytes (names) or is truncated and space-padded (record values).
//!
//! Failures are field-local: a slot whose bytes do not decode under the
//! source encoding, or whose text cannot be encoded under the target, is
//! left untouched and the pass continues.  Nothing in this module aborts a
//! whole file.

use std::borrow::Cow;

use crate::encoding::{decode, encode, EncodingName};
use crate::layout::{
    strip_padding, DbfLayout, DESC_DECIMAL_OFFSET, DESC_LENGTH_OFFSET, DESC_NAME_LEN,
    DESC_TYPE_OFFSET,
};

/// Space byte used to right-pad rewritten record slots.
const SLOT_PAD: u8 = 0x20;

/// Per-pass counters.  `truncated_slots` is the lossy case callers may want
/// to surface: a value that grew past its fixed width on re-encoding and
/// lost its tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeStats {
    pub rewritten_slots: usize,
    pub skipped_slots:   usize,
    pub truncated_slots: usize,
    pub renamed_fields:  usize,
}

/// Rewrite the text content of `buf` from `source` to `target`.
///
/// Canonically equal encodings are a no-op and return the input borrowed.
pub fn transcode<'a>(
    buf: &'a [u8],
    layout: &DbfLayout,
    source: EncodingName,
    target: EncodingName,
) -> (Cow<'a, [u8]>, TranscodeStats) {
    let mut stats = TranscodeStats::default();
    if source == target {
        return (Cow::Borrowed(buf), stats);
    }

    let mut out = buf.to_vec();

    for field in &layout.fields {
        if rewrite_name_slot(&mut out, field.table_offset(), source, target) {
            stats.renamed_fields += 1;
        }
    }

    let slots = layout.text_slots();
    for i in 0..layout.header.record_count {
        let span = match layout.record_span(i, out.len()) {
            Some(span) => span,
            None => break,
        };
        for slot in &slots {
            let start = span.start + slot.offset as usize;
            let end = start + slot.length as usize;
            if end > span.end {
                break;
            }
            rewrite_record_slot(&mut out[start..end], source, target, &mut stats);
        }
    }

    (Cow::Owned(out), stats)
}

/// Re-encode one descriptor's 11-byte name slot in place.
///
/// The rewrite is abandoned (original bytes kept) when the re-encoded name
/// no longer fits 11 bytes, fails to decode/encode, or would disturb the
/// type/length/decimal bytes at fixed offsets 11/16/17 of the descriptor.
fn rewrite_name_slot(
    out: &mut [u8],
    desc_offset: usize,
    source: EncodingName,
    target: EncodingName,
) -> bool {
    let slot = &out[desc_offset..desc_offset + DESC_NAME_LEN];
    let trimmed = strip_padding(slot);
    if trimmed.is_empty() || trimmed.is_ascii() {
        return false; // nothing encoding-dependent in the name
    }

    let text = match decode(trimmed, source) {
        Ok(text) => text.into_owned(),
        Err(_) => return false,
    };
    let encoded = match encode(&text, target) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    if encoded.len() > DESC_NAME_LEN {
        return false;
    }

    let mut candidate = [0u8; DESC_NAME_LEN];
    candidate[..encoded.len()].copy_from_slice(&encoded);

    // Guard against corrupting the adjacent descriptor metadata: the write
    // must leave the type/length/decimal bytes exactly as they were.
    let keeps = |meta: usize| {
        meta >= DESC_NAME_LEN || candidate[meta] == out[desc_offset + meta]
    };
    if !(keeps(DESC_TYPE_OFFSET) && keeps(DESC_LENGTH_OFFSET) && keeps(DESC_DECIMAL_OFFSET)) {
        return false;
    }

    out[desc_offset..desc_offset + DESC_NAME_LEN].copy_from_slice(&candidate);
    true
}

/// Re-encode one record slot in place: `min(encoded, width)` bytes copied,
/// remainder space-padded.  Excess bytes are truncated, which for a
/// double-byte source and a wider variable-width target can lose the tail
/// of a value; the caller sees that in `stats.truncated_slots`.
fn rewrite_record_slot(
    slot: &mut [u8],
    source: EncodingName,
    target: EncodingName,
    stats: &mut TranscodeStats,
) {
    let trimmed = strip_padding(slot);
    if trimmed.is_empty() {
        return;
    }

    let text = match decode(trimmed, source) {
        Ok(text) => text.into_owned(),
        Err(_) => {
            stats.skipped_slots += 1;
            return;
        }
    };
    let encoded = match encode(&text, target) {
        Ok(bytes) => bytes,
        Err(_) => {
            stats.skipped_slots += 1;
            return;
        }
    };

    let take = encoded.len().min(slot.len());
    slot[..take].copy_from_slice(&encoded[..take]);
    for b in &mut slot[take..] {
        *b = SLOT_PAD;
    }
    if encoded.len() > slot.len() {
        stats.truncated_slots += 1;
    }
    stats.rewritten_slots += 1;
}
