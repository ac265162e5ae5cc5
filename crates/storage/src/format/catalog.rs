//! Catalog file format
//!
//! The catalog file is the whole on-disk state of a database.
//!
//! # Format
//!
//! ```text
//! +------------------+
//! | Magic: "GDBK"    | 4 bytes
//! | Format Version   | 4 bytes (u32 LE)
//! | Payload Length   | 4 bytes (u32 LE)
//! | Payload          | variable (bincode-encoded Catalog)
//! | CRC32            | 4 bytes
//! +------------------+
//! ```

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;

/// Catalog magic bytes: "GDBK" (0x4744424B)
pub const CATALOG_MAGIC: [u8; 4] = *b"GDBK";

/// Current catalog format version
pub const CATALOG_FORMAT_VERSION: u32 = 1;

/// magic(4) + version(4) + payload_len(4)
const HEADER_SIZE: usize = 12;

const CRC_SIZE: usize = 4;

/// Encoding, decoding and atomic persistence of catalog files.
pub struct CatalogFile;

impl CatalogFile {
    /// Serialize a catalog to bytes
    pub fn to_bytes(catalog: &Catalog) -> Result<Vec<u8>, CatalogError> {
        let payload =
            bincode::serialize(catalog).map_err(|e| CatalogError::Encoding(e.to_string()))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len() + CRC_SIZE);
        bytes.extend_from_slice(&CATALOG_MAGIC);
        bytes.extend_from_slice(&CATALOG_FORMAT_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);

        // CRC32 of all preceding bytes
        let crc = crc32fast::hash(&bytes);
        bytes.extend_from_slice(&crc.to_le_bytes());

        Ok(bytes)
    }

    /// Deserialize a catalog from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Catalog, CatalogError> {
        if bytes.len() < HEADER_SIZE + CRC_SIZE {
            return Err(CatalogError::TooShort);
        }

        if bytes[0..4] != CATALOG_MAGIC {
            return Err(CatalogError::InvalidMagic);
        }

        let (data, crc_bytes) = bytes.split_at(bytes.len() - CRC_SIZE);
        let stored_crc = u32::from_le_bytes(le_array(crc_bytes));
        let computed_crc = crc32fast::hash(data);
        if stored_crc != computed_crc {
            return Err(CatalogError::ChecksumMismatch {
                expected: stored_crc,
                computed: computed_crc,
            });
        }

        let format_version = u32::from_le_bytes(le_array(&bytes[4..8]));
        if format_version != CATALOG_FORMAT_VERSION {
            return Err(CatalogError::UnsupportedVersion(format_version));
        }

        let payload_len = u32::from_le_bytes(le_array(&bytes[8..12])) as usize;
        if HEADER_SIZE + payload_len != data.len() {
            return Err(CatalogError::TooShort);
        }

        bincode::deserialize(&data[HEADER_SIZE..]).map_err(|e| CatalogError::Encoding(e.to_string()))
    }

    /// Read and decode the catalog file at `path`
    pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Persist a catalog atomically (write-fsync-rename)
    ///
    /// With `sync` off the temp file and parent directory are not fsynced;
    /// the rename is still atomic.
    pub fn persist(path: &Path, catalog: &Catalog, sync: bool) -> Result<(), CatalogError> {
        let temp_path = sibling(path, ".tmp");

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)?;

        file.write_all(&Self::to_bytes(catalog)?)?;
        if sync {
            file.sync_all()?;
        }
        drop(file);

        std::fs::rename(&temp_path, path)?;

        if sync {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                File::open(parent)?.sync_all()?;
            }
        }

        Ok(())
    }
}

/// `path` with `suffix` appended to its file name (`gdb.dex` -> `gdb.dex.lock`).
pub(crate) fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn le_array(bytes: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&bytes[..4]);
    out
}

/// Errors that can occur with catalog files
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file too short
    #[error("catalog too short")]
    TooShort,

    /// Invalid magic bytes
    #[error("invalid magic bytes")]
    InvalidMagic,

    /// Written by an unknown format version
    #[error("unsupported catalog format version {0}")]
    UnsupportedVersion(u32),

    /// Checksum mismatch
    #[error("checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        /// Expected CRC32 value (from file)
        expected: u32,
        /// Computed CRC32 value
        computed: u32,
    },

    /// Payload could not be encoded or decoded
    #[error("catalog encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CatalogError> for gdbkit_core::Error {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Io(io) => gdbkit_core::Error::IoError(io),
            other => gdbkit_core::Error::storage(other.to_string()),
        }
    }
}
