//! Phone data file writer.
//!
//! Produces files in the layout the reader expects: header, record
//! region, then the sorted index running to end of file. Identical
//! records are stored once and shared by every key that uses them.

use ahash::AHashMap;
use std::collections::BTreeMap;

use super::format::*;
use crate::key::MAX_KEY;
use crate::{Error, PhoneType, Result};

/// Builder for phone data files.
pub struct PhoneDataWriter {
    version: [u8; VERSION_SIZE],
    entries: BTreeMap<u32, (u8, String)>,
}

impl PhoneDataWriter {
    pub fn new(version: [u8; VERSION_SIZE]) -> Self {
        Self {
            version,
            entries: BTreeMap::new(),
        }
    }

    /// Add a prefix with its region fields.
    ///
    /// A later call with the same key replaces the earlier one.
    pub fn add(
        &mut self,
        key: u32,
        phone_type: PhoneType,
        province: &str,
        city: &str,
        zip_code: u32,
        area_code: u32,
    ) -> Result<()> {
        for field in [province, city] {
            if field.contains(FIELD_DELIMITER) || field.as_bytes().contains(&RECORD_TERMINATOR) {
                return Err(Error::Build(format!(
                    "record field {:?} contains a delimiter or terminator",
                    field
                )));
            }
        }
        let record = format!(
            "{province}{d}{city}{d}{zip_code}{d}{area_code}",
            d = FIELD_DELIMITER
        );
        self.add_raw(key, phone_type.as_u8(), &record)
    }

    /// Add a prefix with an arbitrary type code and record text.
    pub fn add_raw(&mut self, key: u32, type_code: u8, record: &str) -> Result<()> {
        if key > MAX_KEY {
            return Err(Error::Build(format!("key {} is wider than 7 digits", key)));
        }
        if record.as_bytes().contains(&RECORD_TERMINATOR) {
            return Err(Error::Build(format!(
                "record for key {} contains a terminator byte",
                key
            )));
        }
        self.entries.insert(key, (type_code, record.to_string()));
        Ok(())
    }

    /// Number of keys added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the file contents.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut data = Vec::from(FileHeader::encode(self.version, 0));
        let mut record_offsets: AHashMap<&str, u32> = AHashMap::new();
        let mut index = Vec::with_capacity(self.entries.len() * INDEX_ENTRY_SIZE);

        for (&key, (type_code, record)) in &self.entries {
            let record_offset = match record_offsets.get(record.as_str()) {
                Some(&offset) => offset,
                None => {
                    let offset = offset_u32(data.len())?;
                    data.extend_from_slice(record.as_bytes());
                    data.push(RECORD_TERMINATOR);
                    record_offsets.insert(record.as_str(), offset);
                    offset
                }
            };

            let entry = IndexEntry {
                key,
                record_offset,
                type_code: *type_code,
            };
            index.extend_from_slice(&entry.to_bytes());
        }

        let first_index_offset = offset_u32(data.len())?;
        data[..HEADER_SIZE].copy_from_slice(&FileHeader::encode(self.version, first_index_offset));
        data.extend_from_slice(&index);

        log::debug!(
            "Built phone data: {} entries, {} unique records, {} bytes",
            self.entries.len(),
            record_offsets.len(),
            data.len()
        );
        Ok(data)
    }
}

fn offset_u32(offset: usize) -> Result<u32> {
    u32::try_from(offset)
        .map_err(|_| Error::Build(format!("offset {} does not fit in 32 bits", offset)))
}
