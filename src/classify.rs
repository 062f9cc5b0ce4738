//! Heuristic encoding classifier.
//!
//! # How it works
//!
//! The classifier scans the sample exactly as a UTF-8 decoder would: ASCII
//! bytes are always valid, multi-byte lead bytes require the right number of
//! `10xxxxxx` continuation bytes.  A failed sequence counts as one invalid
//! unit and the scan advances a single byte so it resynchronizes quickly
//! inside double-byte text.
//!
//! The verdict is deliberately biased toward UTF-8: only strong evidence of
//! non-UTF-8 multi-byte content flips the answer to Shift_JIS, because
//! misclassifying already-clean UTF-8 would corrupt it on transcode, while
//! misclassifying Shift_JIS merely leaves existing mojibake in place.
//!
//! The thresholds are empirical, not derived from a model; they live in
//! [`ClassifierParams`] so callers can tune them.

use crate::encoding::EncodingName;

/// Tunable decision thresholds for [`classify`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifierParams {
    /// Invalid sequences above this fraction of valid sequences flip the
    /// verdict to the legacy fallback.
    pub max_invalid_ratio: f64,
    /// What the classifier answers when evidence says "not UTF-8".
    pub fallback: EncodingName,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self { max_invalid_ratio: 0.10, fallback: EncodingName::ShiftJis }
    }
}

/// Tallies from one scan, exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTally {
    pub valid_sequences:   usize,
    pub invalid_sequences: usize,
    pub ascii_bytes:       usize,
}

impl ScanTally {
    /// Valid sequences that were genuinely multi-byte.
    pub fn multibyte_sequences(&self) -> usize {
        self.valid_sequences - self.ascii_bytes
    }
}

/// Scan `sample` and count UTF-8 sequence validity.
pub fn scan_utf8(sample: &[u8]) -> ScanTally {
    let mut tally = ScanTally::default();
    let mut i = 0;
    while i < sample.len() {
        let lead = sample[i];
        let width = match lead {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 0, // bare continuation byte or invalid lead
        };
        if width == 0 || i + width > sample.len() {
            tally.invalid_sequences += 1;
            i += 1;
            continue;
        }
        if sample[i + 1..i + width].iter().all(|&b| b & 0xC0 == 0x80) {
            tally.valid_sequences += 1;
            if width == 1 {
                tally.ascii_bytes += 1;
            }
            i += width;
        } else {
            // Bad continuation: advance one byte, not the whole width, so
            // the scan resynchronizes inside double-byte text.
            tally.invalid_sequences += 1;
            i += 1;
        }
    }
    tally
}

/// Classify a sample as UTF-8 or the configured legacy fallback.
///
/// An empty sample is insufficient evidence and classifies as UTF-8.
pub fn classify(sample: &[u8], params: &ClassifierParams) -> EncodingName {
    let tally = scan_utf8(sample);
    if tally.invalid_sequences == 0 {
        return EncodingName::Utf8;
    }
    let outnumbers_multibyte = tally.invalid_sequences > tally.multibyte_sequences();
    let over_ratio = tally.invalid_sequences as f64
        > tally.valid_sequences as f64 * params.max_invalid_ratio;
    if outnumbers_multibyte || over_ratio {
        params.fallback
    } else {
        EncodingName::Utf8
    }
}
