//! Subnetwork id table, one signed byte per core node.
//!
//! Layout (little-endian):
//!
//! Header (12 bytes):
//!   magic:      u32 = 0x54454E53  // "SNET"
//!   version:    u16 = 1
//!   reserved:   u16 = 0
//!   node_count: u32
//!
//! Body (node_count bytes):
//!   i8 subnetwork id per core-node index

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// No subnetwork assigned yet.
pub const UNSET_SUBNETWORK: i8 = -1;
/// The node belongs to a component too small to carry landmarks.
pub const UNCLEAR_SUBNETWORK: i8 = 0;

const MAGIC: u32 = 0x54454E53; // "SNET"
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 12;

pub struct SubnetworkTable {
    path: PathBuf,
    data: Vec<i8>,
    closed: bool,
}

impl SubnetworkTable {
    pub fn new(path: PathBuf) -> Self {
        Self { path, data: Vec::new(), closed: false }
    }

    /// Allocate one byte per core node, all `UNSET_SUBNETWORK`.
    pub fn create(&mut self, node_count: usize) {
        self.data = vec![UNSET_SUBNETWORK; node_count];
    }

    pub fn node_count(&self) -> usize {
        self.data.len()
    }

    pub fn set_subnetwork(&mut self, core_index: usize, id: i8) {
        self.data[core_index] = id;
    }

    pub fn subnetwork(&self, core_index: usize) -> i8 {
        self.data[core_index]
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
        let node_count = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        if body.len() as u32 != node_count {
            return Err(Error::Corrupt(format!(
                "size mismatch in {}: expected {} bytes, got {}",
                self.path.display(),
                node_count,
                body.len()
            )));
        }
        self.data = body.into_iter().map(|b| b as i8).collect();
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
        writer.write_all(&(self.data.len() as u32).to_le_bytes())?;
        for &b in &self.data {
            writer.write_all(&[b as u8])?;
        }
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
