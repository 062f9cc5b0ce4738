//! Shared helpers for the integration tests: a minimal synthetic `.dbf`
//! builder matching the on-disk layout the crate parses.

use byteorder::{ByteOrder, LittleEndian};

pub struct DbfBuilder {
    fields:  Vec<(Vec<u8>, u8, u8)>,
    records: Vec<Vec<Vec<u8>>>,
}

impl DbfBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new(), records: Vec::new() }
    }

    pub fn field(mut self, name: &str, kind: u8, length: u8) -> Self {
        assert!(name.len() <= 11);
        self.fields.push((name.as_bytes().to_vec(), kind, length));
        self
    }

    pub fn record_bytes(mut self, values: &[&[u8]]) -> Self {
        assert_eq!(values.len(), self.fields.len());
        self.records.push(values.iter().map(|v| v.to_vec()).collect());
        self
    }

    pub fn record(self, values: &[&str]) -> Self {
        let raw: Vec<&[u8]> = values.iter().map(|v| v.as_bytes()).collect();
        self.record_bytes(&raw)
    }

    pub fn build(self) -> Vec<u8> {
        let header_len = 32 + self.fields.len() * 32 + 1;
        let record_len: usize =
            1 + self.fields.iter().map(|(_, _, len)| *len as usize).sum::<usize>();

        let mut buf = vec![0u8; 32];
        buf[0] = 0x03;
        LittleEndian::write_u32(&mut buf[4..8], self.records.len() as u32);
        LittleEndian::write_u16(&mut buf[8..10], header_len as u16);
        LittleEndian::write_u16(&mut buf[10..12], record_len as u16);

        for (name, kind, length) in &self.fields {
            let mut slot = [0u8; 32];
            slot[..name.len()].copy_from_slice(name);
            slot[11] = *kind;
            slot[16] = *length;
            buf.extend_from_slice(&slot);
        }
        buf.push(0x0D);

        for record in &self.records {
            buf.push(0x20);
            for ((_, _, length), value) in self.fields.iter().zip(record) {
                let width = *length as usize;
                let take = value.len().min(width);
                buf.extend_from_slice(&value[..take]);
                buf.extend(std::iter::repeat(0x20).take(width - take));
            }
        }
        buf.push(0x1A);
        buf
    }
}

pub fn sjis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}
