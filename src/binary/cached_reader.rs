//! Cached phone reader with hot reload support.
//!
//! This module provides a shared lookup handle with:
//! - LRU cache for lookup outcomes, keyed by the 7-digit prefix
//! - Atomic hot reload for swapping in a new data file without downtime
//! - Thread-safe concurrent access

use arc_swap::ArcSwap;
use memmap2::Mmap;
use quick_cache::sync::Cache;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::reader::PhoneReader;
use super::source::ByteSource;
use crate::key::parse_key;
use crate::{Error, PhoneInfo, PhoneType, ReaderConfig, Record, Result};

/// Cached outcome for one key. `None` records a miss.
type CachedEntry = Option<(Record, Option<PhoneType>)>;

/// Cached phone reader with hot reload support.
///
/// This reader wraps [`PhoneReader`] and adds:
/// - LRU cache so repeated prefixes skip the index search
/// - Atomic hot reload to replace the data file while serving lookups
///
/// Only successful lookups and not-found outcomes are cached; validation,
/// format and IO errors always reach the caller fresh.
///
/// # Example
///
/// ```ignore
/// use phonedata::CachedPhoneReader;
///
/// let reader = CachedPhoneReader::open("phone.dat")?;
/// let info = reader.lookup("18888881234")?;
///
/// // Hot reload a newer data file
/// reader.reload("phone-new.dat")?;
/// ```
pub struct CachedPhoneReader<S = Mmap> {
    /// Current reader and its cache, swapped together on reload.
    inner: ArcSwap<Snapshot<S>>,
    /// Configuration.
    config: ReaderConfig,
    /// Generation counter, incremented on each reload.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// A reader and the outcomes computed from it.
///
/// A lookup that started before a reload writes into the cache of the
/// snapshot it loaded, never into the cache of its replacement.
struct Snapshot<S> {
    reader: Arc<PhoneReader<S>>,
    cache: Option<Cache<u32, CachedEntry>>,
}

impl<S> Snapshot<S> {
    fn new(reader: PhoneReader<S>, config: &ReaderConfig) -> Self {
        let cache = if config.caching() {
            Some(Cache::new(config.cache_capacity))
        } else {
            None
        };
        Self {
            reader: Arc::new(reader),
            cache,
        }
    }
}

impl CachedPhoneReader<Mmap> {
    /// Open a phone data file with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a phone data file with custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let reader = PhoneReader::open_with_config(path, &config)?;
        Ok(Self::with_config(reader, config))
    }

    /// Hot reload from a new file.
    ///
    /// This atomically replaces the underlying reader together with an
    /// empty cache. In-flight lookups complete against the old file, new
    /// lookups use the new one. On error the current file stays in place.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let reader = PhoneReader::open_with_config(path, &self.config)?;
        self.replace(reader);
        log::info!("Hot reloaded phone data from {:?}", path);
        Ok(())
    }
}

impl CachedPhoneReader<Vec<u8>> {
    /// Create from bytes with default configuration.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_config(data, ReaderConfig::default())
    }

    /// Create from bytes with custom configuration.
    pub fn from_bytes_with_config(data: Vec<u8>, config: ReaderConfig) -> Result<Self> {
        let reader = PhoneReader::with_config(data, &config)?;
        Ok(Self::with_config(reader, config))
    }

    /// Hot reload from bytes.
    pub fn reload_from_bytes(&self, data: Vec<u8>) -> Result<()> {
        let reader = PhoneReader::with_config(data, &self.config)?;
        self.replace(reader);
        log::info!("Hot reloaded phone data from bytes");
        Ok(())
    }
}

impl<S: ByteSource> CachedPhoneReader<S> {
    /// Wrap an already opened reader.
    pub fn with_config(reader: PhoneReader<S>, config: ReaderConfig) -> Self {
        Self {
            inner: ArcSwap::from_pointee(Snapshot::new(reader, &config)),
            config,
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Swap in a new reader with an empty cache.
    pub fn replace(&self, reader: PhoneReader<S>) {
        self.inner.store(Arc::new(Snapshot::new(reader, &self.config)));
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Look up a phone number with caching.
    pub fn lookup(&self, phone: &str) -> Result<PhoneInfo> {
        let key = parse_key(phone)?;
        let snapshot = self.inner.load();
        let reader = &snapshot.reader;

        if let Some(ref cache) = snapshot.cache {
            if let Some(cached) = cache.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return match cached {
                    Some((record, phone_type)) => Ok(PhoneInfo::new(
                        phone,
                        record,
                        phone_type,
                        reader.record_count(),
                    )),
                    None => Err(Error::NotFound { key }),
                };
            }
            self.misses.fetch_add(1, Ordering::Relaxed);
        }

        let outcome = reader
            .find_entry(key)
            .and_then(|entry| Ok((reader.resolve(&entry)?, entry.phone_type())));

        match outcome {
            Ok((record, phone_type)) => {
                if let Some(ref cache) = snapshot.cache {
                    cache.insert(key, Some((record.clone(), phone_type)));
                }
                Ok(PhoneInfo::new(
                    phone,
                    record,
                    phone_type,
                    reader.record_count(),
                ))
            }
            Err(err) => {
                if err.is_not_found() {
                    if let Some(ref cache) = snapshot.cache {
                        cache.insert(key, None);
                    }
                }
                Err(err)
            }
        }
    }

    /// Number of entries in the current file's index.
    pub fn record_count(&self) -> u64 {
        self.inner.load().reader.record_count()
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        if let Some(ref cache) = self.inner.load().cache {
            cache.clear();
        }
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        match self.inner.load().cache {
            Some(ref cache) => CacheStats {
                capacity: self.config.cache_capacity,
                len: cache.len(),
                enabled: true,
                hits,
                misses,
            },
            None => CacheStats {
                capacity: 0,
                len: 0,
                enabled: false,
                hits,
                misses,
            },
        }
    }

    /// Get the current generation (incremented on each reload).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Get the configuration this reader was created with.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Get the current underlying reader.
    ///
    /// Note: The returned Arc may become stale after a hot reload.
    pub fn inner(&self) -> Arc<PhoneReader<S>> {
        Arc::clone(&self.inner.load().reader)
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Maximum cache capacity.
    pub capacity: usize,
    /// Current number of entries in the cache.
    pub len: usize,
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that went to the file.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
