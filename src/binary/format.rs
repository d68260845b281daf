//! Binary format constants and structures.

use std::borrow::Cow;

use super::source::ByteSource;
use crate::error::Phase;
use crate::{Error, PhoneType, Result};

/// Size of the opaque version tag at the start of the file.
pub const VERSION_SIZE: usize = 4;

/// Header size in bytes: version tag + first index offset (u32 LE).
pub const HEADER_SIZE: usize = 8;

/// Size of one index entry: key (4) + record offset (4) + type code (1).
pub const INDEX_ENTRY_SIZE: usize = 9;

/// Byte that ends a record in the record region.
pub const RECORD_TERMINATOR: u8 = 0;

/// Separator between record fields.
pub const FIELD_DELIMITER: char = '|';

/// Province and city are mandatory.
pub const MIN_RECORD_FIELDS: usize = 2;

/// Parsed file header plus the layout derived from the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Version tag, stored but not interpreted
    pub version: [u8; VERSION_SIZE],
    /// Absolute offset of the first index entry
    pub first_index_offset: u64,
    /// Number of whole index entries between `first_index_offset` and EOF
    pub index_count: u64,
    /// Total size of the backing file
    pub file_size: u64,
}

impl FileHeader {
    /// Read and validate the header of `source`.
    pub fn read<S: ByteSource + ?Sized>(source: &S) -> Result<Self> {
        let file_size = source.len();
        let mut bytes = [0u8; HEADER_SIZE];
        source
            .read_exact_at(0, &mut bytes)
            .map_err(|e| Error::read(Phase::Header, e, "file header"))?;
        Self::parse(&bytes, file_size)
    }

    /// Parse header bytes of a file that is `file_size` bytes long.
    pub fn parse(bytes: &[u8; HEADER_SIZE], file_size: u64) -> Result<Self> {
        let mut version = [0u8; VERSION_SIZE];
        version.copy_from_slice(&bytes[..VERSION_SIZE]);
        let first_index_offset =
            u64::from(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]));

        if first_index_offset < HEADER_SIZE as u64 {
            return Err(Error::Format(format!(
                "first index offset {} overlaps the {}-byte header",
                first_index_offset, HEADER_SIZE
            )));
        }
        if first_index_offset > file_size {
            return Err(Error::Format(format!(
                "first index offset {} is beyond end of file ({} bytes)",
                first_index_offset, file_size
            )));
        }

        let index_len = file_size - first_index_offset;
        let trailing = index_len % INDEX_ENTRY_SIZE as u64;
        if trailing != 0 {
            log::warn!(
                "Index region has {} trailing bytes after the last whole entry",
                trailing
            );
        }

        Ok(Self {
            version,
            first_index_offset,
            index_count: index_len / INDEX_ENTRY_SIZE as u64,
            file_size,
        })
    }

    /// Serialize the stored part of the header.
    pub fn encode(version: [u8; VERSION_SIZE], first_index_offset: u32) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..VERSION_SIZE].copy_from_slice(&version);
        bytes[VERSION_SIZE..].copy_from_slice(&first_index_offset.to_le_bytes());
        bytes
    }

    /// Version tag as text.
    pub fn version_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.version)
    }

    /// Absolute offset of the entry at `position`, `None` on overflow.
    pub fn entry_offset(&self, position: u64) -> Option<u64> {
        position
            .checked_mul(INDEX_ENTRY_SIZE as u64)?
            .checked_add(self.first_index_offset)
    }
}

/// One 9-byte index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    /// Numeric value of the first 7 digits
    pub key: u32,
    /// Absolute offset of the record
    pub record_offset: u32,
    /// Carrier type code
    pub type_code: u8,
}

impl IndexEntry {
    pub fn from_bytes(bytes: &[u8; INDEX_ENTRY_SIZE]) -> Self {
        Self {
            key: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            record_offset: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            type_code: bytes[8],
        }
    }

    pub fn to_bytes(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        bytes[0..4].copy_from_slice(&self.key.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.record_offset.to_le_bytes());
        bytes[8] = self.type_code;
        bytes
    }

    /// Carrier type, `None` for unknown codes.
    pub fn phone_type(&self) -> Option<PhoneType> {
        PhoneType::from_u8(self.type_code)
    }
}
