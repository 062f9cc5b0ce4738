//! Bounded sample extraction for encoding analysis.
//!
//! Walks the parsed layout and the record area and collects a size-capped
//! byte sample of everything text-bearing: the field names from the
//! descriptor table, then record values in field order.  Work is O(cap)
//! regardless of file size — the record walk stops as soon as the cap is
//! reached, splitting a field's contribution mid-slot if it has to.
//!
//! An empty sample is a valid result (no text fields, or no records), not
//! an error.  Callers treat it as insufficient evidence and default to
//! UTF-8.

use crate::layout::{strip_padding, DbfLayout};

/// Default sample cap.  A few kilobytes of attribute text is plenty for the
/// classifier; larger samples only add scan cost.
pub const DEFAULT_SAMPLE_CAP: usize = 4096;

/// Collect up to `cap` bytes of cleaned text-field content from `buf`.
pub fn extract_sample(buf: &[u8], layout: &DbfLayout, cap: usize) -> Vec<u8> {
    let mut sample = Vec::with_capacity(cap.min(DEFAULT_SAMPLE_CAP));

    for field in &layout.fields {
        append_capped(&mut sample, field.trimmed_name(), cap);
        if sample.len() >= cap {
            return sample;
        }
    }

    let slots = layout.text_slots();
    if slots.is_empty() || layout.header.record_len == 0 {
        return sample;
    }

    // Enough records to fill the cap even if every slot byte survives
    // padding-stripping; never more than the file declares.
    let record_budget = (cap / layout.header.record_len as usize + 1) as u32;
    let record_limit = layout.header.record_count.min(record_budget);

    for i in 0..record_limit {
        let span = match layout.record_span(i, buf.len()) {
            Some(span) => span,
            None => break, // declared count overruns the buffer
        };
        let record = &buf[span];
        for slot in &slots {
            let start = slot.offset as usize;
            let end = start + slot.length as usize;
            if end > record.len() {
                break;
            }
            append_capped(&mut sample, strip_padding(&record[start..end]), cap);
            if sample.len() >= cap {
                return sample;
            }
        }
    }
    sample
}

fn append_capped(sample: &mut Vec<u8>, bytes: &[u8], cap: usize) {
    let room = cap.saturating_sub(sample.len());
    sample.extend_from_slice(&bytes[..bytes.len().min(room)]);
}
