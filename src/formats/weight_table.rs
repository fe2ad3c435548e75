//! Landmark weight matrix file.
//!
//! Layout (little-endian):
//!
//! Header (24 bytes):
//!   magic:        u32 = 0x574C4D43  // "CMLW"
//!   version:      u16 = 1
//!   reserved:     u16 = 0
//!   core_nodes:   i32
//!   landmarks:    i32
//!   subnetworks:  i32
//!   factor_1e6:   i32  // round(factor * 1e6)
//!
//! Body:
//!   weights:  core_nodes * landmarks * 4 bytes
//!             // u16 'from' at +0 and u16 'to' at +2 per (node, landmark)
//!   mapping:  subnetworks * landmarks * 4 bytes
//!             // i32 landmark graph-node ids, subnetwork 0 is a placeholder
//!
//! The body is byte-addressed from offset 0 so that cell addresses computed
//! as `core_index * row_len + landmark_index * 4` work unchanged in memory
//! and on disk.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

const MAGIC: u32 = 0x574C4D43; // "CMLW"
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 24;
const HEADER_FIELDS: usize = 4;

pub struct WeightTable {
    path: PathBuf,
    header: [i32; HEADER_FIELDS],
    data: Vec<u8>,
    closed: bool,
}

impl WeightTable {
    pub fn new(path: PathBuf) -> Self {
        Self { path, header: [0; HEADER_FIELDS], data: Vec::new(), closed: false }
    }

    /// Grow the body to at least `bytes`; new bytes are zero.
    pub fn ensure_capacity(&mut self, bytes: u64) {
        if self.data.len() < bytes as usize {
            self.data.resize(bytes as usize, 0);
        }
    }

    pub fn capacity(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn get_u16(&self, offset: u64) -> u16 {
        let i = offset as usize;
        u16::from_le_bytes([self.data[i], self.data[i + 1]])
    }

    pub fn set_u16(&mut self, offset: u64, value: u16) {
        let i = offset as usize;
        self.data[i..i + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn get_i32(&self, offset: u64) -> i32 {
        let i = offset as usize;
        i32::from_le_bytes([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    pub fn set_i32(&mut self, offset: u64, value: i32) {
        let i = offset as usize;
        self.data[i..i + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Header slots: 0 = core nodes, 1 = landmarks, 2 = subnetworks,
    /// 3 = factor * 1e6.
    pub fn header(&self, slot: usize) -> i32 {
        self.header[slot]
    }

    pub fn set_header(&mut self, slot: usize, value: i32) {
        self.header[slot] = value;
    }

    /// Read the file back; `Ok(false)` when it does not exist yet.
    pub fn load(&mut self) -> Result<bool> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        let mut reader = BufReader::new(file);

        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != MAGIC {
            return Err(Error::Corrupt(format!(
                "invalid magic in {}: expected {MAGIC:#010x}, got {magic:#010x}",
                self.path.display()
            )));
        }
        let version = u16::from_le_bytes([header[4], header[5]]);
        if version != VERSION {
            return Err(Error::Corrupt(format!(
                "unsupported version in {}: {version}",
                self.path.display()
            )));
        }
        for slot in 0..HEADER_FIELDS {
            let at = 8 + slot * 4;
            self.header[slot] =
                i32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]]);
        }

        let row_len = self.header[1] as u64 * 4;
        let expected = self.header[0] as u64 * row_len + self.header[2] as u64 * row_len;
        self.data.clear();
        reader.read_to_end(&mut self.data)?;
        if self.data.len() as u64 != expected {
            return Err(Error::Corrupt(format!(
                "size mismatch in {}: expected {} body bytes, got {}",
                self.path.display(),
                expected,
                self.data.len()
            )));
        }
        Ok(true)
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&MAGIC.to_le_bytes())?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u16.to_le_bytes())?;
        for slot in 0..HEADER_FIELDS {
            writer.write_all(&self.header[slot].to_le_bytes())?;
        }
        writer.write_all(&self.data)?;
        writer.flush()?;
        Ok(())
    }

    /// Release the in-memory body. Idempotent.
    pub fn close(&mut self) {
        self.data = Vec::new();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
