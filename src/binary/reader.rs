//! Phone data file reader with memory-mapping support.

use memmap2::Mmap;
use std::cmp::Ordering;
use std::fs::File;
use std::path::Path;

use super::format::*;
use super::source::{ByteSource, FileSource};
use crate::error::Phase;
use crate::key::parse_key;
use crate::{Error, PhoneInfo, ReaderConfig, Record, Result};

/// Reader over a phone data file.
///
/// The header is parsed once at construction; every lookup after that is
/// a binary search over the index region followed by one record read.
/// Lookups take `&self` and are safe to run concurrently whenever the
/// source is `Sync`.
pub struct PhoneReader<S = Mmap> {
    source: S,
    header: FileHeader,
}

impl PhoneReader<Mmap> {
    /// Open and memory-map a phone data file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &ReaderConfig::default())
    }

    /// Open and memory-map a phone data file with custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            phase: Phase::Open,
            source,
        })?;
        // The data file is immutable for the lifetime of the mapping.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|source| Error::Io {
            phase: Phase::Open,
            source,
        })?;

        let reader = Self::with_config(mmap, config)?;
        log::debug!(
            "Opened phone data {:?}: version {}, {} index entries",
            path,
            reader.version(),
            reader.record_count()
        );
        Ok(reader)
    }
}

impl PhoneReader<FileSource> {
    /// Open a phone data file without mapping it.
    ///
    /// Every read is a seek + read on one shared file handle, so
    /// concurrent lookups are serialized.
    pub fn open_unmapped(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let source = FileSource::open(path.as_ref()).map_err(|source| Error::Io {
            phase: Phase::Open,
            source,
        })?;
        Self::with_config(source, config)
    }
}

impl PhoneReader<Vec<u8>> {
    /// Read a phone data file held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(data)
    }
}

impl<S: ByteSource> PhoneReader<S> {
    /// Create a reader over `source` with default configuration.
    pub fn new(source: S) -> Result<Self> {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Create a reader over `source`.
    ///
    /// With `verify_index` set, the whole index is scanned once and a
    /// file whose keys are not strictly ascending is rejected.
    pub fn with_config(source: S, config: &ReaderConfig) -> Result<Self> {
        let header = FileHeader::read(&source)?;
        let reader = Self { source, header };
        if config.verify_index {
            reader.verify_index()?;
        }
        Ok(reader)
    }

    /// Get the parsed file header.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Version tag from the file header.
    pub fn version(&self) -> String {
        self.header.version_str().into_owned()
    }

    /// Number of entries in the index region.
    pub fn record_count(&self) -> u64 {
        self.header.index_count
    }

    /// Get the underlying byte source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Look up a phone number.
    ///
    /// Only the first 7 digits are used; the full string is echoed back
    /// in the result.
    pub fn lookup(&self, phone: &str) -> Result<PhoneInfo> {
        let key = parse_key(phone)?;
        let entry = self.find_entry(key)?;
        let record = self.resolve(&entry)?;
        Ok(PhoneInfo::new(
            phone,
            record,
            entry.phone_type(),
            self.record_count(),
        ))
    }

    /// Binary search the index for an exact key match.
    ///
    /// Reads at most one entry per halving step and never falls back to a
    /// neighbouring key.
    pub fn find_entry(&self, key: u32) -> Result<IndexEntry> {
        let mut low = 0u64;
        let mut high = self.header.index_count;

        while low < high {
            let mid = low + (high - low) / 2;
            let entry = self.read_entry(mid)?;

            match entry.key.cmp(&key) {
                Ordering::Greater => high = mid,
                Ordering::Less => low = mid + 1,
                Ordering::Equal => {
                    log::trace!("Found key {} at index position {}", key, mid);
                    return Ok(entry);
                }
            }
        }

        log::trace!("Key {} not in index", key);
        Err(Error::NotFound { key })
    }

    /// Read the record an index entry points at.
    pub fn resolve(&self, entry: &IndexEntry) -> Result<Record> {
        let offset = u64::from(entry.record_offset);
        if offset >= self.source.len() {
            return Err(Error::Format(format!(
                "record offset {} for key {} is beyond end of file ({} bytes)",
                offset,
                entry.key,
                self.source.len()
            )));
        }

        let bytes = self
            .source
            .read_until(offset, RECORD_TERMINATOR)
            .map_err(|e| {
                Error::read(
                    Phase::Resolve,
                    e,
                    format_args!("unterminated record at offset {}", offset),
                )
            })?;
        Record::parse(offset, &bytes)
    }

    /// Check that index keys are strictly ascending and that every record
    /// offset lies inside the file.
    pub fn verify_index(&self) -> Result<()> {
        let mut previous: Option<u32> = None;

        for position in 0..self.header.index_count {
            let entry = self.read_entry(position)?;

            if let Some(prev) = previous {
                if entry.key <= prev {
                    return Err(Error::Format(format!(
                        "index not strictly ascending at entry {}: key {} follows {}",
                        position, entry.key, prev
                    )));
                }
            }
            if u64::from(entry.record_offset) >= self.source.len() {
                return Err(Error::Format(format!(
                    "index entry {} points past end of file (offset {})",
                    position, entry.record_offset
                )));
            }
            previous = Some(entry.key);
        }

        log::debug!("Verified {} index entries", self.header.index_count);
        Ok(())
    }

    fn read_entry(&self, position: u64) -> Result<IndexEntry> {
        let offset = self
            .header
            .entry_offset(position)
            .filter(|offset| {
                offset
                    .checked_add(INDEX_ENTRY_SIZE as u64)
                    .is_some_and(|end| end <= self.source.len())
            })
            .ok_or_else(|| {
                Error::Format(format!(
                    "index entry {} extends past end of file ({} bytes)",
                    position,
                    self.source.len()
                ))
            })?;

        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        self.source
            .read_exact_at(offset, &mut bytes)
            .map_err(|e| Error::read(Phase::Search, e, format_args!("index entry {}", position)))?;
        Ok(IndexEntry::from_bytes(&bytes))
    }
}
