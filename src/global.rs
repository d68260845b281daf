//! Process-wide default database and stateless lookups.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use crate::binary::{CachedPhoneReader, PhoneReader};
use crate::error::{Error, Result};
use crate::{PhoneInfo, ReaderConfig};

/// Default database shared by [`lookup`].
static GLOBAL_READER: Lazy<RwLock<Option<Arc<CachedPhoneReader>>>> =
    Lazy::new(|| RwLock::new(None));

/// Install the default database from a data file.
///
/// Calling this again replaces the current database.
pub fn init_database(path: impl AsRef<Path>) -> Result<()> {
    init_database_with_config(path, ReaderConfig::default())
}

/// Install the default database with custom configuration.
pub fn init_database_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<()> {
    let path = path.as_ref();
    let reader = CachedPhoneReader::open_with_config(path, config)?;
    let count = reader.record_count();

    let mut guard = GLOBAL_READER.write();
    *guard = Some(Arc::new(reader));

    log::info!(
        "Initialized phone database from {:?} ({} index entries)",
        path,
        count
    );
    Ok(())
}

/// Check if the default database is initialized.
pub fn is_initialized() -> bool {
    GLOBAL_READER.read().is_some()
}

/// Look up a phone number in the default database.
pub fn lookup(phone: &str) -> Result<PhoneInfo> {
    let reader = GLOBAL_READER
        .read()
        .as_ref()
        .map(Arc::clone)
        .ok_or(Error::NotInitialized)?;
    reader.lookup(phone)
}

/// Open `path`, look up one phone number, and close the file again.
///
/// Prefer a long-lived [`PhoneReader`] or [`CachedPhoneReader`] when
/// doing more than a handful of lookups.
pub fn find(path: impl AsRef<Path>, phone: &str) -> Result<PhoneInfo> {
    PhoneReader::open(path)?.lookup(phone)
}
