//! End-to-end tests for the phone data reader.
//!
//! These tests build files with the writer or by hand and check the full
//! lookup path: header parsing, index search, and record resolution.

use super::format::*;
use super::reader::PhoneReader;
use super::source::ByteSource;
use super::writer::PhoneDataWriter;
use crate::{Error, PhoneType, ReaderConfig};

/// Build the reference file: tag "ZX01", index at 16, one entry, and the
/// record right behind the entry.
fn reference_file() -> Vec<u8> {
    let mut data = FileHeader::encode(*b"ZX01", 16).to_vec();
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(
        &IndexEntry {
            key: 1_888_888,
            record_offset: 25,
            type_code: 1,
        }
        .to_bytes(),
    );
    data.extend_from_slice("广东|深圳|518000|755\0".as_bytes());
    data
}

/// Keys 1_000_000, 1_000_010, 1_000_020, ... with one record per key.
fn spaced_file(n: u32) -> Vec<u8> {
    let mut writer = PhoneDataWriter::new(*b"TEST");
    for i in 0..n {
        let key = 1_000_000 + i * 10;
        writer
            .add_raw(key, (i % 6 + 1) as u8, &format!("P{i}|C{i}|{i}|{key}"))
            .unwrap();
    }
    writer.build().unwrap()
}

// ============================================================================
// Reference scenario
// ============================================================================

#[test]
fn test_reference_file_lookup() {
    let reader = PhoneReader::from_bytes(reference_file()).unwrap();
    assert_eq!(reader.version(), "ZX01");

    let info = reader.lookup("18888881234").unwrap();
    assert_eq!(info.phone, "18888881234");
    assert_eq!(info.province, "广东");
    assert_eq!(info.city, "深圳");
    assert_eq!(info.zip_code, 518000);
    assert_eq!(info.area_code, 755);
    assert_eq!(info.carrier(), "mobile");
    assert_eq!(info.record_count, reader.record_count());
}

#[test]
fn test_reference_file_missing_key() {
    let reader = PhoneReader::from_bytes(reference_file()).unwrap();
    match reader.lookup("1999999") {
        Err(Error::NotFound { key }) => assert_eq!(key, 1_999_999),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

// ============================================================================
// Binary search
// ============================================================================

#[test]
fn test_empty_index() {
    let reader = PhoneReader::from_bytes(spaced_file(0)).unwrap();
    assert_eq!(reader.record_count(), 0);
    assert!(reader.lookup("1000000").unwrap_err().is_not_found());
}

#[test]
fn test_every_present_key_is_found() {
    for n in [1u32, 2, 3, 4, 7, 8, 31, 64, 100] {
        let reader = PhoneReader::from_bytes(spaced_file(n)).unwrap();
        assert_eq!(reader.record_count(), u64::from(n));

        for i in 0..n {
            let key = 1_000_000 + i * 10;
            let info = reader.lookup(&key.to_string()).unwrap();
            assert_eq!(info.province, format!("P{i}"), "n={n} key={key}");
            assert_eq!(info.city, format!("C{i}"));
            assert_eq!(info.zip_code, i);
            assert_eq!(info.area_code, key);
            assert!(info.phone_type.is_some());
        }
    }
}

#[test]
fn test_keys_between_entries_are_not_found() {
    for n in [1u32, 2, 3, 8, 31] {
        let reader = PhoneReader::from_bytes(spaced_file(n)).unwrap();

        let below = reader.find_entry(999_999).unwrap_err();
        assert!(below.is_not_found());
        for i in 0..n {
            let gap = 1_000_000 + i * 10 + 5;
            assert!(reader.find_entry(gap).unwrap_err().is_not_found(), "n={n} gap={gap}");
        }
        assert!(reader.find_entry(9_999_999).unwrap_err().is_not_found());
    }
}

#[test]
fn test_find_entry_returns_type_and_offset() {
    let reader = PhoneReader::from_bytes(spaced_file(5)).unwrap();
    let entry = reader.find_entry(1_000_030).unwrap();
    assert_eq!(entry.key, 1_000_030);
    assert_eq!(entry.phone_type(), Some(PhoneType::TelecomVirtual));

    let record = reader.resolve(&entry).unwrap();
    assert_eq!(record.province, "P3");
}

#[test]
fn test_repeated_lookups_are_identical() {
    let reader = PhoneReader::from_bytes(spaced_file(17)).unwrap();
    let first = reader.lookup("10000801234").unwrap();
    for _ in 0..5 {
        assert_eq!(reader.lookup("10000801234").unwrap(), first);
    }
}

// ============================================================================
// Records and carriers
// ============================================================================

#[test]
fn test_unknown_type_code_still_resolves() {
    let mut writer = PhoneDataWriter::new(*b"TEST");
    writer.add_raw(1_700_000, 42, "北京|北京|100000|10").unwrap();
    let reader = PhoneReader::from_bytes(writer.build().unwrap()).unwrap();

    let info = reader.lookup("1700000").unwrap();
    assert_eq!(info.phone_type, None);
    assert_eq!(info.carrier(), "");
    assert_eq!(info.city, "北京");
}

#[test]
fn test_lenient_codes() {
    let mut writer = PhoneDataWriter::new(*b"TEST");
    writer.add_raw(1_700_000, 5, "江苏|南京").unwrap();
    writer.add_raw(1_700_001, 5, "江苏|苏州|n/a|0512").unwrap();
    let reader = PhoneReader::from_bytes(writer.build().unwrap()).unwrap();

    let info = reader.lookup("1700000").unwrap();
    assert_eq!((info.zip_code, info.area_code), (0, 0));
    assert_eq!(info.carrier(), "unicom_virtual");

    let info = reader.lookup("1700001").unwrap();
    assert_eq!((info.zip_code, info.area_code), (0, 512));
}

#[test]
fn test_record_with_one_field_fails() {
    let mut writer = PhoneDataWriter::new(*b"TEST");
    writer.add_raw(1_700_000, 1, "江苏").unwrap();
    let reader = PhoneReader::from_bytes(writer.build().unwrap()).unwrap();
    assert!(matches!(
        reader.lookup("1700000"),
        Err(Error::Record { offset, .. }) if offset == HEADER_SIZE as u64
    ));
}

#[test]
fn test_long_record() {
    let province = "省".repeat(500);
    let mut writer = PhoneDataWriter::new(*b"TEST");
    writer
        .add(1_700_000, PhoneType::Telecom, &province, "市", 1, 2)
        .unwrap();
    let reader = PhoneReader::from_bytes(writer.build().unwrap()).unwrap();
    assert_eq!(reader.lookup("1700000").unwrap().province, province);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_queries_never_search() {
    let reader = PhoneReader::from_bytes(reference_file()).unwrap();
    for query in ["", "188888", "18888a81234", " 1888888"] {
        assert!(
            matches!(reader.lookup(query), Err(Error::InvalidPhone { .. })),
            "query {query:?}"
        );
    }
    assert!(reader.lookup("1888888").is_ok());
}

// ============================================================================
// Malformed files
// ============================================================================

#[test]
fn test_short_file() {
    assert!(matches!(
        PhoneReader::from_bytes(b"ZX0".to_vec()),
        Err(Error::Format(_))
    ));
}

#[test]
fn test_index_offset_beyond_eof() {
    let mut data = spaced_file(3);
    let len = data.len() as u32;
    data[4..8].copy_from_slice(&(len + 1).to_le_bytes());
    assert!(matches!(PhoneReader::from_bytes(data), Err(Error::Format(_))));
}

#[test]
fn test_static_truncation_shrinks_entry_count() {
    let mut data = spaced_file(4);
    data.truncate(data.len() - 4);

    // The entry count is floor((len - first) / 9), so a cut-off last entry
    // is not part of the index at all.
    let reader = PhoneReader::from_bytes(data).unwrap();
    assert_eq!(reader.record_count(), 3);
    assert!(reader.lookup("1000000").is_ok());
    assert!(reader.lookup("1000030").unwrap_err().is_not_found());
}

/// Reports the length a file had at open time while holding only the
/// bytes left after it was cut short.
struct ShrunkSource {
    data: Vec<u8>,
    claimed_len: u64,
}

impl ByteSource for ShrunkSource {
    fn len(&self) -> u64 {
        self.claimed_len
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
        self.data.read_exact_at(offset, buf)
    }
}

#[test]
fn test_index_entry_cut_after_open_is_format_error() {
    let data = spaced_file(4);
    let claimed_len = data.len() as u64;
    let source = ShrunkSource {
        data: data[..data.len() - 4].to_vec(),
        claimed_len,
    };

    let reader = PhoneReader::new(source).unwrap();
    assert_eq!(reader.record_count(), 4);
    assert!(reader.lookup("1000000").is_ok());
    assert!(matches!(reader.lookup("1000030"), Err(Error::Format(_))));
}

#[test]
fn test_missing_keys_are_never_format_errors() {
    let reader =
        PhoneReader::with_config(spaced_file(50), &ReaderConfig::default().verified()).unwrap();
    for key in (999_990..1_000_600).step_by(3) {
        match reader.find_entry(key) {
            Ok(entry) => assert_eq!(entry.key, key),
            Err(err) => assert!(err.is_not_found(), "key {key}: {err}"),
        }
    }
}

#[test]
fn test_concurrent_lookups_share_reader() {
    use std::sync::Arc;
    use std::thread;

    let reader = Arc::new(PhoneReader::from_bytes(spaced_file(200)).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let reader = Arc::clone(&reader);
            thread::spawn(move || {
                for i in (t..200).step_by(4) {
                    let key = 1_000_000 + i * 10;
                    let info = reader.lookup(&key.to_string()).unwrap();
                    assert_eq!(info.zip_code, i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
