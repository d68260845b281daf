//! Binary phone data format and readers.
//!
//! A data file is a small header, a blob of NUL-terminated records, and a
//! sorted array of fixed-width index entries running to end of file.
//! Lookups binary search the index and read one record.
//!
//! # File Structure
//!
//! ```text
//! +------------------+
//! |     HEADER       |  8 bytes: version tag (4) + first index offset (u32 LE)
//! +------------------+
//! |  RECORD REGION   |  "province|city|zip|area\0" records
//! +------------------+
//! |   INDEX REGION   |  9-byte entries: key (u32 LE) + record offset (u32 LE) + type (u8)
//! +------------------+
//! ```

mod cached_reader;
mod format;
mod reader;
mod source;
pub mod writer;

#[cfg(test)]
mod tests;

pub use cached_reader::{CacheStats, CachedPhoneReader};
pub use format::*;
pub use reader::PhoneReader;
pub use source::{ByteSource, FileSource};
pub use writer::PhoneDataWriter;
