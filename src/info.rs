//! Lookup result types.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::binary::{FIELD_DELIMITER, MIN_RECORD_FIELDS};
use crate::{Error, PhoneType, Result};

/// Region fields decoded from one record of the record region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub province: String,
    pub city: String,
    /// Postal code, 0 when missing or not numeric
    pub zip_code: u32,
    /// Area code, 0 when missing or not numeric
    pub area_code: u32,
}

impl Record {
    /// Parse `province|city|zip|area` record text read from `offset`.
    ///
    /// Province and city are required. Zip and area codes fall back to 0
    /// instead of failing the record, and extra fields are ignored.
    pub fn parse(offset: u64, bytes: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(bytes);
        let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();

        if fields.len() < MIN_RECORD_FIELDS {
            return Err(Error::Record {
                offset,
                reason: format!(
                    "expected at least {} fields, found {}",
                    MIN_RECORD_FIELDS,
                    fields.len()
                ),
            });
        }

        Ok(Self {
            province: fields[0].to_string(),
            city: fields[1].to_string(),
            zip_code: lenient_number(fields.get(2)),
            area_code: lenient_number(fields.get(3)),
        })
    }
}

fn lenient_number(field: Option<&&str>) -> u32 {
    field.and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// Result of a successful phone lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneInfo {
    /// The query string as given by the caller
    pub phone: String,
    pub province: String,
    pub city: String,
    pub zip_code: u32,
    pub area_code: u32,
    /// Carrier, `None` for type codes outside the known set
    #[serde(serialize_with = "serialize_carrier")]
    pub phone_type: Option<PhoneType>,
    /// Number of entries in the index
    pub record_count: u64,
}

impl PhoneInfo {
    pub fn new(
        phone: &str,
        record: Record,
        phone_type: Option<PhoneType>,
        record_count: u64,
    ) -> Self {
        Self {
            phone: phone.to_string(),
            province: record.province,
            city: record.city,
            zip_code: record.zip_code,
            area_code: record.area_code,
            phone_type,
            record_count,
        }
    }

    /// Carrier label, empty when the type code is unknown.
    pub fn carrier(&self) -> &'static str {
        PhoneType::label_or_empty(self.phone_type)
    }
}

impl fmt::Display for PhoneInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} zip={} area={} {}",
            self.phone,
            self.province,
            self.city,
            self.zip_code,
            self.area_code,
            self.carrier()
        )
    }
}

fn serialize_carrier<S: Serializer>(
    phone_type: &Option<PhoneType>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(PhoneType::label_or_empty(*phone_type))
}
