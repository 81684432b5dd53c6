//! Container packer
//!
//! Single linear pass: compute the trailing length, write the file header,
//! then the fixed record sequence and the end marker. The trailing length is
//! computed once, before any record is written, against the pre-filter input
//! length; under `HighBitMode::Drop` the record stream may carry fewer bytes
//! (original behavior, see config.rs).

use crate::exceptions::Result;
use crate::xxu::config::PackConfig;
use crate::xxu::constants::{
    END_MARKER, OS_HEADER_RECORD_LEN, PAYLOAD_RECORD_LEN, SIG_DATA, TAG_DATA, TAG_SECTION_END,
    TAG_TERMINAL,
};
use crate::xxu::header::{os_header, write_file_header};
use crate::xxu::record::{emit_record, filter_payload, payload_records_size, record_size};
use log::{debug, info};
use std::io::Write;

/// Byte count of everything following the file-header length field, declared
/// up front in the header. Exact for inputs with no high-bit bytes.
pub fn trailing_length(input_len: usize) -> u32 {
    let total = record_size(OS_HEADER_RECORD_LEN)
        + record_size(0)
        + payload_records_size(input_len)
        + 3 * record_size(PAYLOAD_RECORD_LEN)
        + record_size(0)
        - 2 // the terminal record carries no CRLF
        + END_MARKER.len();
    total as u32
}

/// Pack a firmware image into an XXU container on `out`
pub fn pack<W: Write>(config: &PackConfig, firmware: &[u8], out: &mut W) -> Result<()> {
    info!(
        "packing {} firmware bytes (calc={:#04x} cert={:#04x} version {}.{:02})",
        firmware.len(),
        config.calc_id,
        config.cert_id,
        config.version.major,
        config.version.minor
    );

    // Phase 1: size up the container before anything is written
    let trailing_len = trailing_length(firmware.len());
    let payload = filter_payload(firmware, config.high_bit)?;
    if payload.len() != firmware.len() {
        debug!(
            "high-bit filter dropped {} of {} payload bytes",
            firmware.len() - payload.len(),
            firmware.len()
        );
    }

    // Phase 2: file header, then the OS header record and section-end marker
    write_file_header(out, config, trailing_len)?;
    emit_record(out, &os_header(config)[..OS_HEADER_RECORD_LEN], 0, TAG_DATA)?;
    emit_record(out, &[], 0, TAG_SECTION_END)?;

    // Phase 3: firmware payload in 32-byte records; addresses wrap at 2^16
    for (i, chunk) in payload.chunks(PAYLOAD_RECORD_LEN).enumerate() {
        let address = ((i * PAYLOAD_RECORD_LEN) & 0xffff) as u16;
        emit_record(out, chunk, address, TAG_DATA)?;
    }

    // Phase 4: placeholder signature records and the terminal record
    emit_record(out, &SIG_DATA[0..32], 0, TAG_DATA)?;
    emit_record(out, &SIG_DATA[32..64], 32, TAG_DATA)?;
    emit_record(out, &SIG_DATA[64..96], 64, TAG_DATA)?;
    emit_record(out, &[], 0, TAG_TERMINAL)?;

    out.write_all(END_MARKER)?;

    debug!("container complete, trailing length {trailing_len}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xxu::config::{CalcModel, HighBitMode};
    use crate::xxu::constants::FILE_HEADER_SIZE;
    use chrono::NaiveDate;

    fn test_config() -> PackConfig {
        PackConfig {
            date: NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
            ..PackConfig::default()
        }
        .with_model(CalcModel::Ti83Plus)
    }

    fn pack_to_vec(config: &PackConfig, firmware: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        pack(config, firmware, &mut out).unwrap();
        out
    }

    /// Split the record stream into individual record texts, checking the
    /// framing along the way.
    fn split_records(container: &[u8]) -> Vec<&[u8]> {
        let stream = &container[FILE_HEADER_SIZE..container.len() - END_MARKER.len()];
        let mut records = Vec::new();
        let mut rest = stream;
        while !rest.is_empty() {
            assert_eq!(rest[0], b':');
            let n = usize::from_str_radix(std::str::from_utf8(&rest[1..3]).unwrap(), 16).unwrap();
            let mut len = record_size(n);
            if len > rest.len() {
                // terminal record, no CRLF
                len -= 2;
            }
            records.push(&rest[..len]);
            rest = &rest[len..];
        }
        records
    }

    fn record_payload_len(record: &[u8]) -> usize {
        usize::from_str_radix(std::str::from_utf8(&record[1..3]).unwrap(), 16).unwrap()
    }

    fn record_address(record: &[u8]) -> u16 {
        u16::from_str_radix(std::str::from_utf8(&record[3..7]).unwrap(), 16).unwrap()
    }

    #[test]
    fn test_empty_input_structure() {
        let out = pack_to_vec(&test_config(), &[]);

        assert_eq!(&out[12..16], &[0x03, 0x05, 0x20, 0x21]);
        assert!(out.ends_with(END_MARKER));

        let records = split_records(&out);
        assert_eq!(records.len(), 6);
        assert_eq!(record_payload_len(records[0]), 24);
        assert_eq!(records[1], b":00000001FF\r\n");
        assert_eq!(record_payload_len(records[2]), 32);
        assert_eq!(record_payload_len(records[3]), 32);
        assert_eq!(record_payload_len(records[4]), 32);
        assert_eq!(records[5], b":00000001FF");
    }

    #[test]
    fn test_payload_chunking() {
        // 40 clean bytes: exactly two payload records at addresses 0 and 32
        let firmware: Vec<u8> = (0..40u8).collect();
        let out = pack_to_vec(&test_config(), &firmware);

        let records = split_records(&out);
        assert_eq!(records.len(), 8);
        assert_eq!(record_payload_len(records[2]), 32);
        assert_eq!(record_address(records[2]), 0);
        assert_eq!(record_payload_len(records[3]), 8);
        assert_eq!(record_address(records[3]), 32);
    }

    #[test]
    fn test_filtered_payload_record() {
        // One high-bit byte in 10: a single 9-byte payload record
        let firmware = [0x01, 0x02, 0x90, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let out = pack_to_vec(&test_config(), &firmware);

        let records = split_records(&out);
        assert_eq!(records.len(), 7);
        assert_eq!(record_payload_len(records[2]), 9);
        assert_eq!(record_address(records[2]), 0);
    }

    #[test]
    fn test_trailing_length_exact_for_clean_input() {
        for len in [0usize, 1, 31, 32, 40, 64, 100] {
            let firmware = vec![0x55u8; len];
            let out = pack_to_vec(&test_config(), &firmware);

            let declared = u32::from_le_bytes(out[74..78].try_into().unwrap());
            assert_eq!(declared as usize, out.len() - FILE_HEADER_SIZE, "len {len}");
        }
    }

    #[test]
    fn test_trailing_length_overstates_for_dirty_input() {
        let firmware = [0x01, 0x02, 0x90, 0x03];
        let out = pack_to_vec(&test_config(), &firmware);

        let declared = u32::from_le_bytes(out[74..78].try_into().unwrap());
        // One dropped byte shortens the record stream by its two hex digits
        assert_eq!(declared as usize, out.len() - FILE_HEADER_SIZE + 2);
    }

    #[test]
    fn test_strict_mode_rejects_dirty_input() {
        let config = PackConfig {
            high_bit: HighBitMode::Reject,
            ..test_config()
        };
        let mut out = Vec::new();
        assert!(pack(&config, &[0x01, 0x90], &mut out).is_err());
    }

    #[test]
    fn test_no_high_bit_bytes_in_any_record_payload() {
        let firmware: Vec<u8> = (0..=255u8).collect();
        let out = pack_to_vec(&test_config(), &firmware);

        // Payload records sit between the section-end marker and the
        // signature records
        let records = split_records(&out);
        for record in &records[2..records.len() - 4] {
            let n = record_payload_len(record);
            let payload = hex::decode(&record[9..9 + 2 * n]).unwrap();
            assert!(payload.iter().all(|&b| b < 0x80));
        }
    }

    #[test]
    fn test_signature_records() {
        let out = pack_to_vec(&test_config(), &[]);
        let records = split_records(&out);

        for (record, offset) in records[2..5].iter().zip([0usize, 32, 64]) {
            assert_eq!(record_address(record), offset as u16);
            let payload = hex::decode(&record[9..9 + 64]).unwrap();
            assert_eq!(payload, &SIG_DATA[offset..offset + 32]);
        }
        // Fillers closing the signature block
        assert_eq!(&SIG_DATA[94..96], &[0x32, 0x64]);
    }
}
