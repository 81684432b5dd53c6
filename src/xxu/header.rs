//! Header builder
//!
//! Assembles the fixed 78-byte binary file header and the tagged OS metadata
//! block carried by the first record. Pure functions of the configuration and
//! the computed trailing length; nothing here can fail beyond the write.

use crate::exceptions::Result;
use crate::xxu::config::PackConfig;
use crate::xxu::constants::{
    DATA_TYPE_OS, DATE_TAG, FIELD_NAME_TAG, MAGIC, OS_HEADER_LEN, OS_HEADER_TEMPLATE,
    PAD_AFTER_NAME, PAD_AFTER_TYPE,
};
use chrono::Datelike;
use log::debug;
use std::io::Write;

/// Pack a two-digit decimal value into one binary-coded-decimal byte
pub fn bcd(x: u8) -> u8 {
    debug_assert!(x < 100);
    (x / 10) * 16 + (x % 10)
}

/// Build the OS metadata block from the configuration.
///
/// Only the first `OS_HEADER_RECORD_LEN` bytes reach the header record; the
/// image-size field past offset 23 is cut short there, matching the format.
pub fn os_header(config: &PackConfig) -> [u8; OS_HEADER_LEN] {
    let mut block = OS_HEADER_TEMPLATE;

    block[2..6].copy_from_slice(&config.os_size.to_be_bytes());
    block[8] = config.cert_id;
    block[11] = config.version.major;
    block[14] = config.version.minor;
    block[17] = config.hardware_max;
    block[23..27].copy_from_slice(&config.image_size.to_be_bytes());

    block
}

/// Write the fixed binary file header: magic, BCD date stamp, calculator
/// type, data-type tag and the little-endian total trailing length.
pub fn write_file_header<W: Write>(
    out: &mut W,
    config: &PackConfig,
    trailing_len: u32,
) -> Result<()> {
    debug!(
        "file header: calc={:#04x} date={} trailing_len={}",
        config.calc_id, config.date, trailing_len
    );

    out.write_all(MAGIC)?;
    out.write_all(&[0x00, 0x00])?;

    out.write_all(&DATE_TAG)?;
    out.write_all(&[
        bcd(config.date.month() as u8),
        bcd(config.date.day() as u8),
        bcd(config.year_high()),
        bcd(config.year_low()),
    ])?;
    out.write_all(FIELD_NAME_TAG)?;

    out.write_all(&[0u8; PAD_AFTER_NAME])?;

    out.write_all(&[config.calc_id])?;
    out.write_all(&[DATA_TYPE_OS])?;

    out.write_all(&[0u8; PAD_AFTER_TYPE])?;

    out.write_all(&trailing_len.to_le_bytes())?;

    Ok(())
}
