// Inventory record layout and little-endian field reads.
use crate::core::layout::RECORD_WIDTH;

/// Identifier value marking an unused inventory slot.
pub const EMPTY_ID: i32 = 0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Record {
    pub id: i32,
    pub count: i32,
}

impl Record {
    pub fn new(id: i32, count: i32) -> Self {
        Self { id, count }
    }

    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_ID
    }

    pub fn encode(&self) -> [u8; RECORD_WIDTH] {
        let mut buf = [0u8; RECORD_WIDTH];
        write_i32(&mut buf, 0, self.id);
        write_i32(&mut buf, 4, self.count);
        buf
    }

    /// Reads the record starting at `offset`. The caller guarantees
    /// `offset + RECORD_WIDTH <= buf.len()`.
    pub fn decode_at(buf: &[u8], offset: usize) -> Self {
        Self {
            id: read_i32(buf, offset),
            count: read_i32(buf, offset + 4),
        }
    }
}

fn read_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(read_4(buf, offset))
}

fn read_4(buf: &[u8], offset: usize) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&buf[offset..offset + 4]);
    out
}

fn write_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
