//! Test-only builder for synthetic `.dbf` buffers.

use byteorder::{ByteOrder, LittleEndian};

use crate::layout::{DESCRIPTOR_SIZE, FIXED_HEADER_SIZE, TABLE_TERMINATOR};

pub struct DbfBuilder {
    fields:  Vec<(Vec<u8>, u8, u8)>,
    records: Vec<Vec<Vec<u8>>>,
}

impl DbfBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new(), records: Vec::new() }
    }

    pub fn field(self, name: &str, kind: u8, length: u8) -> Self {
        self.field_bytes(name.as_bytes(), kind, length)
    }

    pub fn field_bytes(mut self, name: &[u8], kind: u8, length: u8) -> Self {
        assert!(name.len() <= 11, "field name too long");
        self.fields.push((name.to_vec(), kind, length));
        self
    }

    pub fn record(self, values: &[&str]) -> Self {
        let raw: Vec<Vec<u8>> = values.iter().map(|v| v.as_bytes().to_vec()).collect();
        self.record_raw(raw)
    }

    pub fn record_bytes(self, values: &[&[u8]]) -> Self {
        let raw: Vec<Vec<u8>> = values.iter().map(|v| v.to_vec()).collect();
        self.record_raw(raw)
    }

    fn record_raw(mut self, values: Vec<Vec<u8>>) -> Self {
        assert_eq!(values.len(), self.fields.len(), "one value per field");
        self.records.push(values);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = FIXED_HEADER_SIZE + self.fields.len() * DESCRIPTOR_SIZE + 1;
        let record_len: usize =
            1 + self.fields.iter().map(|(_, _, len)| *len as usize).sum::<usize>();

        let mut buf = vec![0u8; FIXED_HEADER_SIZE];
        buf[0] = 0x03; // dBase III without memo
        LittleEndian::write_u32(&mut buf[4..8], self.records.len() as u32);
        LittleEndian::write_u16(&mut buf[8..10], header_len as u16);
        LittleEndian::write_u16(&mut buf[10..12], record_len as u16);

        for (name, kind, length) in &self.fields {
            let mut slot = [0u8; DESCRIPTOR_SIZE];
            slot[..name.len()].copy_from_slice(name);
            slot[11] = *kind;
            slot[16] = *length;
            buf.extend_from_slice(&slot);
        }
        buf.push(TABLE_TERMINATOR);

        for record in &self.records {
            buf.push(0x20); // deletion flag: live record
            for ((_, _, length), value) in self.fields.iter().zip(record) {
                let width = *length as usize;
                let take = value.len().min(width);
                buf.extend_from_slice(&value[..take]);
                buf.extend(std::iter::repeat(0x20).take(width - take));
            }
        }
        buf.push(0x1A); // EOF marker many writers append
        buf
    }
}
