//! phonedata - Phone number prefix lookup over a binary index.
//!
//! This crate resolves the first 7 digits of a mainland China mobile
//! number to its province, city, postal code, area code and carrier,
//! using a pre-built, read-only data file.
//!
//! # Features
//!
//! - **Exact-match binary search**: O(log n) reads over a sorted index
//! - **Memory-mapped files**: Open once, look up from many threads
//! - **Pluggable byte sources**: mmap, plain file, or in-memory bytes
//! - **Cached reader**: LRU cache with atomic hot reload
//!
//! # Quick Start
//!
//! ```ignore
//! use phonedata::PhoneReader;
//!
//! let reader = PhoneReader::open("phone.dat")?;
//! let info = reader.lookup("18888881234")?;
//! println!("{} {} {}", info.province, info.city, info.carrier());
//! ```
//!
//! For one-off lookups, [`find`] opens the file for a single query. A
//! process-wide database can be installed with [`init_database`] and
//! queried through [`lookup`].
//!
//! # Errors
//!
//! A prefix that is simply not in the file yields [`Error::NotFound`];
//! use [`Error::is_not_found`] to tell it apart from a malformed file
//! ([`Error::Format`]), a bad record ([`Error::Record`]) or an invalid
//! query ([`Error::InvalidPhone`]).

mod config;
mod error;
mod global;
mod info;
mod key;
mod phone_type;

pub mod binary;

// Re-export core types
pub use config::ReaderConfig;
pub use error::{Error, Phase, Result};
pub use info::{PhoneInfo, Record};
pub use key::parse_key;
pub use phone_type::PhoneType;

// Re-export global API functions
pub use global::{find, init_database, init_database_with_config, is_initialized, lookup};

// Re-export reader types
pub use binary::{CachedPhoneReader, PhoneDataWriter, PhoneReader};
