//! DBF attribute-file layout parser.
//!
//! Reads the fixed 32-byte header and the field-descriptor table of a raw
//! `.dbf` buffer and produces a structural description of the record area.
//! All multi-byte integers on disk are unsigned little-endian; no runtime
//! byte-order negotiation is ever performed.
//!
//! The parser interprets structure only.  It never looks at record *values*
//! beyond their declared offsets and widths, and it has no side effects.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Size of the fixed header prefix.  A buffer shorter than this is not a
/// DBF file at all; callers must treat it as "cannot parse", not "empty".
pub const FIXED_HEADER_SIZE: usize = 32;
/// Size of one field-descriptor slot in the header table.
pub const DESCRIPTOR_SIZE: usize = 32;
/// Byte terminating the descriptor table.
pub const TABLE_TERMINATOR: u8 = 0x0D;

// Fixed offsets inside one 32-byte descriptor slot.
pub const DESC_NAME_LEN: usize = 11;
pub const DESC_TYPE_OFFSET: usize = 11;
pub const DESC_LENGTH_OFFSET: usize = 16;
pub const DESC_DECIMAL_OFFSET: usize = 17;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("buffer too short for a DBF header: {0} bytes")]
    Truncated(usize),
    #[error("declared header length {declared} is invalid for a {available}-byte buffer")]
    HeaderOverrun { declared: u16, available: usize },
    #[error("declared record length is zero")]
    ZeroRecordLength,
}

/// Fixed-offset header fields this engine needs.  Bytes 0–3 (version and
/// last-update stamp) are carried through untouched and not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbfHeader {
    pub record_count: u32,
    pub header_len:   u16,
    pub record_len:   u16,
}

/// One column of the attribute table.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Raw 11-byte name slot, NUL/space padded, encoding unknown at parse time.
    pub name:          [u8; DESC_NAME_LEN],
    /// ASCII type letter (`C` character, `M` memo, `N` numeric, ...).
    pub kind:          u8,
    pub length:        u8,
    pub decimal_count: u8,
    /// In-record byte offset of this field's value; offset 0 is the
    /// per-record deletion flag, so the first field starts at 1.
    pub record_offset: u32,
    /// Index of this descriptor's 32-byte slot in the header table.
    pub table_index:   usize,
}

impl FieldDescriptor {
    /// Character and memo columns are the only text-bearing kinds.
    pub fn is_text(&self) -> bool {
        self.kind == b'C' || self.kind == b'M'
    }

    /// Name bytes with trailing NUL/space padding stripped.
    pub fn trimmed_name(&self) -> &[u8] {
        strip_padding(&self.name)
    }

    /// Absolute byte offset of this descriptor's slot in the file buffer.
    pub fn table_offset(&self) -> usize {
        FIXED_HEADER_SIZE + self.table_index * DESCRIPTOR_SIZE
    }
}

/// A text-bearing field's position within each record.  The slot list is
/// identical for every record of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFieldSlot {
    pub offset: u32,
    pub length: u8,
}

/// Parsed structural description of a `.dbf` buffer.
#[derive(Debug, Clone)]
pub struct DbfLayout {
    pub header: DbfHeader,
    /// Every descriptor in table order.  Offsets accumulate across ALL
    /// fields so text-slot positions stay correct past numeric columns.
    pub fields: Vec<FieldDescriptor>,
}

impl DbfLayout {
    /// Slots for the text-bearing fields only, in record order.
    pub fn text_slots(&self) -> Vec<TextFieldSlot> {
        self.fields
            .iter()
            .filter(|f| f.is_text())
            .map(|f| TextFieldSlot { offset: f.record_offset, length: f.length })
            .collect()
    }

    pub fn has_text_fields(&self) -> bool {
        self.fields.iter().any(|f| f.is_text())
    }

    /// Byte range of record `i` in the file buffer, or `None` when the
    /// declared record count overruns the actual buffer.
    pub fn record_span(&self, i: u32, buf_len: usize) -> Option<std::ops::Range<usize>> {
        let start = self.header.header_len as usize + i as usize * self.header.record_len as usize;
        let end = start + self.header.record_len as usize;
        (i < self.header.record_count && end <= buf_len).then_some(start..end)
    }
}

/// Strip trailing NUL and space padding from a fixed-width value.
pub fn strip_padding(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0x00 && b != 0x20)
        .map_or(0, |p| p + 1);
    &bytes[..end]
}

/// Parse the header and descriptor table of `buf`.
///
/// Record data past `header_len` is NOT validated here; a file whose record
/// area is shorter than `record_count * record_len` declares (common with a
/// trailing 0x1A EOF byte) still parses, and [`DbfLayout::record_span`]
/// bounds-checks each access.
pub fn parse_layout(buf: &[u8]) -> Result<DbfLayout, LayoutError> {
    if buf.len() < FIXED_HEADER_SIZE {
        return Err(LayoutError::Truncated(buf.len()));
    }

    let header = DbfHeader {
        record_count: LittleEndian::read_u32(&buf[4..8]),
        header_len:   LittleEndian::read_u16(&buf[8..10]),
        record_len:   LittleEndian::read_u16(&buf[10..12]),
    };

    if (header.header_len as usize) < FIXED_HEADER_SIZE
        || header.header_len as usize > buf.len()
    {
        return Err(LayoutError::HeaderOverrun {
            declared:  header.header_len,
            available: buf.len(),
        });
    }
    if header.record_len == 0 && header.record_count > 0 {
        return Err(LayoutError::ZeroRecordLength);
    }

    let mut fields = Vec::new();
    // First field value starts after the 1-byte deletion flag.
    let mut record_offset: u32 = 1;
    let mut pos = FIXED_HEADER_SIZE;
    let mut table_index = 0;

    while pos + DESCRIPTOR_SIZE <= header.header_len as usize {
        if buf[pos] == TABLE_TERMINATOR {
            break;
        }
        let slot = &buf[pos..pos + DESCRIPTOR_SIZE];
        let mut name = [0u8; DESC_NAME_LEN];
        name.copy_from_slice(&slot[..DESC_NAME_LEN]);

        let field = FieldDescriptor {
            name,
            kind:          slot[DESC_TYPE_OFFSET],
            length:        slot[DESC_LENGTH_OFFSET],
            decimal_count: slot[DESC_DECIMAL_OFFSET],
            record_offset,
            table_index,
        };
        record_offset += field.length as u32;
        fields.push(field);

        pos += DESCRIPTOR_SIZE;
        table_index += 1;
    }

    Ok(DbfLayout { header, fields })
}
