//! Resolved pack configuration
//!
//! All option parsing resolves into one immutable [`PackConfig`] before any
//! output is produced; the header builder and record encoder only ever see it
//! by shared reference.

use crate::exceptions::{Result, XxuError};
use chrono::{Datelike, Local, NaiveDate};
use std::str::FromStr;

/// Default calculator (link device) type byte
pub const DEFAULT_CALC_ID: u8 = 0x73;

/// Default certificate id
pub const DEFAULT_CERT_ID: u8 = 0x04;

/// Default maximum compatible hardware revision
pub const DEFAULT_HARDWARE_MAX: u8 = 0xff;

/// Target calculator presets for calc/cert id pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcModel {
    /// TI-73
    Ti73,
    /// TI-83 Plus
    Ti83Plus,
    /// TI-84 Plus
    Ti84Plus,
}

impl CalcModel {
    /// Calculator type byte for this model
    pub fn calc_id(self) -> u8 {
        match self {
            CalcModel::Ti73 => 0x74,
            CalcModel::Ti83Plus => 0x73,
            CalcModel::Ti84Plus => 0x73,
        }
    }

    /// Certificate id for this model
    pub fn cert_id(self) -> u8 {
        match self {
            CalcModel::Ti73 => 0x02,
            CalcModel::Ti83Plus => 0x04,
            CalcModel::Ti84Plus => 0x0a,
        }
    }
}

impl FromStr for CalcModel {
    type Err = XxuError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "73" => Ok(CalcModel::Ti73),
            "83p" => Ok(CalcModel::Ti83Plus),
            "84p" => Ok(CalcModel::Ti84Plus),
            _ => Err(XxuError::ConfigError(format!(
                "unknown calculator type '{s}'. Try '73', '83p', or '84p'"
            ))),
        }
    }
}

/// OS version as two decimal components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsVersion {
    pub major: u8,
    pub minor: u8,
}

impl Default for OsVersion {
    fn default() -> Self {
        OsVersion { major: 1, minor: 0 }
    }
}

impl FromStr for OsVersion {
    type Err = XxuError;

    /// Parse "MAJOR.FRAC"; the minor component is the fractional part scaled
    /// to hundredths ("2.43" -> 2.43, "1.5" -> 1.50, "3" -> 3.00).
    fn from_str(s: &str) -> Result<Self> {
        let bad = || XxuError::ConfigError(format!("invalid OS version '{s}'"));

        let (major_str, frac_str) = match s.split_once('.') {
            Some((m, f)) => (m, f),
            None => (s, ""),
        };

        let major: u8 = major_str.parse().map_err(|_| bad())?;

        let minor = if frac_str.is_empty() {
            0
        } else {
            if frac_str.len() > 2 || !frac_str.bytes().all(|b| b.is_ascii_digit()) {
                return Err(bad());
            }
            let frac: u8 = frac_str.parse().map_err(|_| bad())?;
            if frac_str.len() == 1 { frac * 10 } else { frac }
        };

        Ok(OsVersion { major, minor })
    }
}

/// Policy for firmware payload bytes with the high bit set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighBitMode {
    /// Drop such bytes silently (original behavior; the declared trailing
    /// length then overstates the actual stream)
    #[default]
    Drop,
    /// Reject the input outright
    Reject,
}

impl FromStr for HighBitMode {
    type Err = XxuError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop" => Ok(HighBitMode::Drop),
            "reject" => Ok(HighBitMode::Reject),
            _ => Err(XxuError::ConfigError(format!(
                "unknown high-bit mode '{s}'. Try 'drop' or 'reject'"
            ))),
        }
    }
}

/// Immutable set of resolved configuration values consumed by the packer
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Calculator (link device) type byte
    pub calc_id: u8,
    /// Certificate / developer key id
    pub cert_id: u8,
    /// OS version
    pub version: OsVersion,
    /// Maximum compatible hardware revision
    pub hardware_max: u8,
    /// Declared program size
    pub os_size: u32,
    /// Declared image size
    pub image_size: u32,
    /// Date stamp embedded in the file header
    pub date: NaiveDate,
    /// High-bit payload policy
    pub high_bit: HighBitMode,
}

impl Default for PackConfig {
    fn default() -> Self {
        PackConfig {
            calc_id: DEFAULT_CALC_ID,
            cert_id: DEFAULT_CERT_ID,
            version: OsVersion::default(),
            hardware_max: DEFAULT_HARDWARE_MAX,
            os_size: 0,
            image_size: 0,
            date: Local::now().date_naive(),
            high_bit: HighBitMode::default(),
        }
    }
}

impl PackConfig {
    /// Apply a calculator preset, overriding calc and certificate ids
    pub fn with_model(mut self, model: CalcModel) -> Self {
        self.calc_id = model.calc_id();
        self.cert_id = model.cert_id();
        self
    }

    /// Century component of the date stamp (two decimal digits)
    pub fn year_high(&self) -> u8 {
        ((self.date.year() / 100) % 100) as u8
    }

    /// Year-within-century component of the date stamp
    pub fn year_low(&self) -> u8 {
        (self.date.year() % 100) as u8
    }
}

/// Parse a byte-valued option, accepting decimal or "0x" hex
pub fn parse_byte_value(s: &str) -> Result<u8> {
    let parsed = if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex_digits, 16)
    } else {
        s.parse()
    };
    parsed.map_err(|_| XxuError::ConfigError(format!("invalid byte value '{s}'")))
}

/// Parse a date stamp option in YYYY-MM-DD form
pub fn parse_date_value(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| XxuError::ConfigError(format!("invalid date '{s}', expected YYYY-MM-DD")))
}
