//! Record encoder
//!
//! One record is `:` + uppercase hex pairs for length, address hi/lo, tag,
//! payload bytes and a closing checksum, then CRLF unless the tag marks the
//! record as file-terminal. The checksum accumulator is local to each call and
//! covers the raw byte values, not their hex encoding.

use crate::exceptions::{Result, XxuError};
use crate::xxu::config::HighBitMode;
use crate::xxu::constants::PAYLOAD_RECORD_LEN;
use log::trace;
use std::io::Write;

/// Encoded text size of a record carrying `n` payload bytes, CRLF included.
/// The file-terminal record is 2 bytes shorter.
pub fn record_size(n: usize) -> usize {
    13 + 2 * n
}

/// Encoded text size of the payload section for a pre-filter input length:
/// full 32-byte records plus one short record for any remainder.
pub fn payload_records_size(input_len: usize) -> usize {
    let full = input_len / PAYLOAD_RECORD_LEN;
    let rem = input_len % PAYLOAD_RECORD_LEN;
    let mut size = full * record_size(PAYLOAD_RECORD_LEN);
    if rem > 0 {
        size += record_size(rem);
    }
    size
}

/// Encode one record and write it to `out`.
///
/// A negative tag is encoded as its absolute value and suppresses the
/// trailing CRLF, marking the record as file-terminal.
pub fn emit_record<W: Write>(out: &mut W, payload: &[u8], address: u16, tag: i8) -> Result<()> {
    debug_assert!(payload.len() <= 0xff);
    trace!(
        "record: n={} address={:#06x} tag={}",
        payload.len(),
        address,
        tag
    );

    let mut raw = Vec::with_capacity(payload.len() + 5);
    raw.push(payload.len() as u8);
    raw.push((address >> 8) as u8);
    raw.push((address & 0xff) as u8);
    raw.push(tag.unsigned_abs());
    raw.extend_from_slice(payload);

    let sum = raw.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    raw.push(sum.wrapping_neg());

    out.write_all(b":")?;
    out.write_all(hex::encode_upper(&raw).as_bytes())?;
    if tag >= 0 {
        out.write_all(b"\r\n")?;
    }
    Ok(())
}

/// Apply the high-bit policy to the firmware payload.
///
/// `Drop` removes every byte >= 0x80 (the record stream then carries fewer
/// bytes than the declared trailing length accounts for); `Reject` fails on
/// the first such byte.
pub fn filter_payload(raw: &[u8], mode: HighBitMode) -> Result<Vec<u8>> {
    match mode {
        HighBitMode::Drop => Ok(raw.iter().copied().filter(|&b| b < 0x80).collect()),
        HighBitMode::Reject => {
            if let Some(pos) = raw.iter().position(|&b| b >= 0x80) {
                return Err(XxuError::PayloadError(format!(
                    "payload byte {:#04x} at offset {pos} has the high bit set",
                    raw[pos]
                )));
            }
            Ok(raw.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(payload: &[u8], address: u16, tag: i8) -> Vec<u8> {
        let mut out = Vec::new();
        emit_record(&mut out, payload, address, tag).unwrap();
        out
    }

    fn record_byte_sum(text: &[u8]) -> u8 {
        // Skip ':' and any trailing CRLF, then sum the decoded byte values.
        let hex_part: Vec<u8> = text[1..]
            .iter()
            .copied()
            .filter(|b| !b"\r\n".contains(b))
            .collect();
        let bytes = hex::decode(&hex_part).unwrap();
        bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
    }

    #[test]
    fn test_terminal_record_bytes() {
        // n=0, address 0, tag -1: the classic end record, no CRLF
        assert_eq!(encode(&[], 0, -1), b":00000001FF");
    }

    #[test]
    fn test_section_end_record_bytes() {
        assert_eq!(encode(&[], 0, 1), b":00000001FF\r\n");
    }

    #[test]
    fn test_crlf_follows_nonnegative_tags() {
        assert!(encode(&[0x12], 0, 0).ends_with(b"\r\n"));
        assert!(encode(&[], 0, 1).ends_with(b"\r\n"));
        assert!(!encode(&[], 0, -1).ends_with(b"\r\n"));
    }

    #[test]
    fn test_checksum_zeroes_record_sum() {
        for (payload, address, tag) in [
            (&[][..], 0u16, 0i8),
            (&[0x01, 0x02, 0x03][..], 0x0020, 0),
            (&[0xff; 32][..], 0x0040, 0),
            (&[0x7f, 0x00, 0x55][..], 0xffff, -1),
        ] {
            let out = encode(payload, address, tag);
            assert_eq!(record_byte_sum(&out), 0, "payload {payload:02X?}");
        }
    }

    #[test]
    fn test_hex_is_uppercase() {
        let out = encode(&[0xab, 0xcd], 0xef01, 0);
        assert!(out.iter().all(|b| !b.is_ascii_lowercase()));
    }

    #[test]
    fn test_record_size_matches_emission() {
        for n in [0usize, 1, 8, 32] {
            let out = encode(&vec![0x42; n], 0, 0);
            assert_eq!(out.len(), record_size(n));
        }
        // Terminal record drops the CRLF
        assert_eq!(encode(&[], 0, -1).len(), record_size(0) - 2);
    }

    #[test]
    fn test_payload_records_size() {
        assert_eq!(payload_records_size(0), 0);
        assert_eq!(payload_records_size(32), record_size(32));
        assert_eq!(payload_records_size(40), record_size(32) + record_size(8));
        assert_eq!(payload_records_size(64), 2 * record_size(32));
    }

    #[test]
    fn test_filter_drops_high_bit_bytes() {
        let raw = [0x10, 0x90, 0x7f, 0x80, 0xff, 0x00];
        let filtered = filter_payload(&raw, HighBitMode::Drop).unwrap();
        assert_eq!(filtered, vec![0x10, 0x7f, 0x00]);
    }

    #[test]
    fn test_reject_mode_names_offset() {
        let raw = [0x10, 0x20, 0x90];
        let err = filter_payload(&raw, HighBitMode::Reject).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("0x90"));
        assert!(msg.contains("offset 2"));

        let clean = [0x10, 0x20, 0x7f];
        assert_eq!(filter_payload(&clean, HighBitMode::Reject).unwrap(), clean);
    }
}
