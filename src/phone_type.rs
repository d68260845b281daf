//! Carrier types stored in the index.

use std::fmt;

use serde::{Serialize, Serializer};

/// Carrier category of a phone prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhoneType {
    /// China Mobile
    Mobile = 1,
    /// China Unicom
    Unicom = 2,
    /// China Telecom
    Telecom = 3,
    /// Virtual operator on the Telecom network
    TelecomVirtual = 4,
    /// Virtual operator on the Unicom network
    UnicomVirtual = 5,
    /// Virtual operator on the Mobile network
    MobileVirtual = 6,
}

impl PhoneType {
    /// Convert from the type code of an index entry.
    ///
    /// Returns `None` for unknown codes.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(PhoneType::Mobile),
            2 => Some(PhoneType::Unicom),
            3 => Some(PhoneType::Telecom),
            4 => Some(PhoneType::TelecomVirtual),
            5 => Some(PhoneType::UnicomVirtual),
            6 => Some(PhoneType::MobileVirtual),
            _ => None,
        }
    }

    /// Convert to the on-disk type code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the label used in lookup results.
    pub fn label(&self) -> &'static str {
        match self {
            PhoneType::Mobile => "mobile",
            PhoneType::Unicom => "unicom",
            PhoneType::Telecom => "telecom",
            PhoneType::TelecomVirtual => "telecom_virtual",
            PhoneType::UnicomVirtual => "unicom_virtual",
            PhoneType::MobileVirtual => "mobile_virtual",
        }
    }

    /// Get the Chinese display name.
    pub fn chinese_name(&self) -> &'static str {
        match self {
            PhoneType::Mobile => "移动",
            PhoneType::Unicom => "联通",
            PhoneType::Telecom => "电信",
            PhoneType::TelecomVirtual => "电信虚拟运营商",
            PhoneType::UnicomVirtual => "联通虚拟运营商",
            PhoneType::MobileVirtual => "移动虚拟运营商",
        }
    }

    /// Label for an optional type, empty when unknown.
    pub fn label_or_empty(phone_type: Option<PhoneType>) -> &'static str {
        phone_type.map(|t| t.label()).unwrap_or("")
    }
}

impl fmt::Display for PhoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for PhoneType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mobile" | "移动" => Ok(PhoneType::Mobile),
            "unicom" | "联通" => Ok(PhoneType::Unicom),
            "telecom" | "电信" => Ok(PhoneType::Telecom),
            "telecom_virtual" | "电信虚拟运营商" => Ok(PhoneType::TelecomVirtual),
            "unicom_virtual" | "联通虚拟运营商" => Ok(PhoneType::UnicomVirtual),
            "mobile_virtual" | "移动虚拟运营商" => Ok(PhoneType::MobileVirtual),
            _ => Err(()),
        }
    }
}

impl Serialize for PhoneType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
