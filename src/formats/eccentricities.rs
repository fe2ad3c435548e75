//! Per-node eccentricity table for isochrone queries.
//!
//! Eccentricities depend on the weighting, so each weighting gets its own
//! file, named `eccentricities_<weighting>`. Rows are fixed width and
//! overwritten in place; callers synchronise externally.
//!
//! Layout (little-endian):
//!
//! Header (12 bytes):
//!   magic:      u32 = 0x54434345  // "ECCT"
//!   version:    u16 = 1
//!   reserved:   u16 = 0
//!   node_count: u32
//!
//! Body (node_count * 8 bytes):
//!   fully_reachable: i32 in {0, 1} at +0
//!   eccentricity:    i32 at +4  // real eccentricity rounded up

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::weighting::weighting_file_name;

const MAGIC: u32 = 0x54434345; // "ECCT"
const VERSION: u16 = 1;
const HEADER_SIZE: usize = 12;

const ECCENTRICITY_BYTES: usize = 8;
const FULLY_REACHABLE_OFFSET: usize = 0;
const ECCENTRICITY_OFFSET: usize = 4;

pub struct EccentricityTable {
    path: PathBuf,
    data: Vec<u8>,
    closed: bool,
}

impl EccentricityTable {
    pub fn new(dir: &Path, weighting_name: &str) -> Self {
        let path = dir.join(format!("eccentricities_{}", weighting_file_name(weighting_name)));
        Self { path, data: Vec::new(), closed: false }
    }

    /// Allocate zeroed rows for `node_count` nodes.
    pub fn init(&mut self, node_count: usize) {
        self.data = vec![0; node_count * ECCENTRICITY_BYTES];
    }

    pub fn node_count(&self) -> usize {
        self.data.len() / ECCENTRICITY_BYTES
    }

    pub fn set_eccentricity(&mut self, node: usize, eccentricity: f64) {
        let at = node * ECCENTRICITY_BYTES + ECCENTRICITY_OFFSET;
        let value = eccentricity.ceil() as i32;
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn eccentricity(&self, node: usize) -> i32 {
        let at = node * ECCENTRICITY_BYTES + ECCENTRICITY_OFFSET;
        i32::from_le_bytes([self.data[at], self.data[at + 1], self.data[at + 2], self.data[at + 3]])
    }

    pub fn set_fully_reachable(&mut self, node: usize, fully_reachable: bool) {
        let at = node * ECCENTRICITY_BYTES + FULLY_REACHABLE_OFFSET;
        let value: i32 = if fully_reachable { 1 } else { 0 };
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn fully_reachable(&self, node: usize) -> bool {
        let at = node * ECCENTRICITY_BYTES + FULLY_REACHABLE_OFFSET;
        i32::from_le_bytes([self.data[at], self.data[at + 1], self.data[at + 2], self.data[at + 3]])
            == 1
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

        self.data.clear();
        reader.read_to_end(&mut self.data)?;
        if self.data.len() != node_count as usize * ECCENTRICITY_BYTES {
            return Err(Error::Corrupt(format!(
                "size mismatch in {}: expected {} rows, got {} bytes",
                self.path.display(),
                node_count,
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
        writer.write_all(&(self.node_count() as u32).to_le_bytes())?;
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
