//! Durable, crash-safe record of every discovered URL and its completion
//! flag: an append-only log of `bincode`-encoded records, replayed on load.
//!
//! Each record is length-prefixed (a `u32` byte count) so a torn final write
//! (process killed mid-append) can be detected and discarded instead of
//! corrupting the whole file: the replay loop stops at the first record it
//! cannot fully read rather than erroring out.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    identifier: String,
    url: String,
    completed: bool,
}

/// The on-disk append log plus the in-memory map it reconstructs into.
pub struct FrontierFile {
    path: PathBuf,
    file: File,
}

impl FrontierFile {
    /// Open (creating if absent) the frontier file for appending.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Delete the underlying file (used when `restart = true`).
    pub fn delete(path: &Path) -> std::io::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Replay the whole log into a map of `identifier -> (url, completed)`.
    /// Later records for the same identifier win, since each mutation
    /// appends a fresh record rather than rewriting history.
    pub fn load(&self) -> std::io::Result<HashMap<String, (String, bool)>> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        let mut map = HashMap::new();

        loop {
            let mut len_buf = [0u8; 4];
            match reader.read_exact(&mut len_buf) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e),
            }
            let len = u32::from_le_bytes(len_buf) as usize;
            let mut buf = vec![0u8; len];
            if reader.read_exact(&mut buf).is_err() {
                // Torn write at the tail: stop replaying, keep what we have.
                break;
            }
            let record: Record = match bincode::deserialize(&buf) {
                Ok(r) => r,
                Err(_) => break,
            };
            map.insert(record.identifier, (record.url, record.completed));
        }

        Ok(map)
    }

    /// Append one record and `sync_all` before returning, so every mutation
    /// is durable on disk before the caller proceeds.
    pub fn append(&mut self, identifier: &str, url: &str, completed: bool) -> std::io::Result<()> {
        let record = Record {
            identifier: identifier.to_string(),
            url: url.to_string(),
            completed,
        };
        let encoded = bincode::serialize(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let len = (encoded.len() as u32).to_le_bytes();

        self.file.write_all(&len)?;
        self.file.write_all(&encoded)?;
        self.file.sync_all()?;
        Ok(())
    }

    pub fn close(&mut self) -> std::io::Result<()> {
        self.file.sync_all()
    }
}
