// Core XXU format constants that never change.
// For resolved configuration values, see config.rs.

/// File magic at offset 0
pub const MAGIC: &[u8; 8] = b"**TIFL**";

/// Fixed tag preceding the BCD date block (offset 10)
pub const DATE_TAG: [u8; 2] = [0x01, 0x88];

/// Fixed length-prefixed field-name tag at offset 16
pub const FIELD_NAME_TAG: &[u8; 9] = b"\x08basecode";

/// "Data type" byte for an OS upgrade (offset 49)
pub const DATA_TYPE_OS: u8 = 0x23;

/// Zero padding after the field-name tag (offsets 25..48)
pub const PAD_AFTER_NAME: usize = 23;

/// Zero padding after the data-type byte (offsets 50..74)
pub const PAD_AFTER_TYPE: usize = 24;

/// Total file header size; the record stream starts here
pub const FILE_HEADER_SIZE: usize = 78;

/// Record tag: data
pub const TAG_DATA: i8 = 0;

/// Record tag: end of header section
pub const TAG_SECTION_END: i8 = 1;

/// Record tag: file-terminal (encoded as its absolute value, no trailing CRLF)
pub const TAG_TERMINAL: i8 = -1;

/// Payload bytes per data record
pub const PAYLOAD_RECORD_LEN: usize = 32;

/// Bytes of the OS header block carried by the header record.
/// Field sizes: size(6) + cert(3) + major(3) + minor(3) + hardware(3) + image(6).
pub const OS_HEADER_RECORD_LEN: usize = 6 + 3 + 3 + 3 + 3 + 6;

/// Full OS header block, tagged fields at fixed offsets. The page-count field
/// sits between hardware and image size and is not counted in
/// `OS_HEADER_RECORD_LEN`, so the record cuts the image-size field short.
pub const OS_HEADER_LEN: usize = 27;

/// Template for the OS header block; config.rs values are patched in by
/// header::os_header. Offsets here and in header.rs must change together.
pub const OS_HEADER_TEMPLATE: [u8; OS_HEADER_LEN] = [
    0x80, 0x0f, 0x00, 0x00, 0x00, 0x00, // declared program size, high byte first
    0x80, 0x11, 0x00, // certificate id
    0x80, 0x21, 0x00, // version major
    0x80, 0x31, 0x00, // version minor
    0x80, 0xa1, 0x00, // max hardware revision
    0x80, 0x81, 0x01, // page count
    0x80, 0x7f, 0x00, 0x00, 0x00, 0x00, // declared image size, high byte first
];

/// Placeholder signature block, split at 0/32/64 into the three signature
/// records. Not cryptographic material: pi digits and filler, the last two
/// bytes being the 0x32/0x64 fillers that close record 3. The produced
/// container will not pass vendor validation.
pub const SIG_DATA: [u8; 96] = [
    0x02, 0x0d, 0x40, //
    0x03, 0x14, 0x15, 0x92, 0x65, 0x35, 0x89, 0x79, //
    0x32, 0x38, 0x46, 0x26, 0x43, 0x38, 0x32, 0x79, //
    0x50, 0x28, 0x84, 0x19, 0x71, 0x69, 0x39, 0x93, //
    0x75, 0x10, 0x58, 0x20, 0x97, 0x49, 0x44, 0x59, //
    0x23, 0x07, 0x81, 0x64, 0x06, 0x28, 0x62, 0x08, //
    0x99, 0x86, 0x28, 0x03, 0x48, 0x25, 0x34, 0x21, //
    0x17, 0x06, 0x79, 0x82, 0x14, 0x80, 0x86, 0x51, //
    0x32, 0x82, 0x30, 0x66, 0x47, 0x09, 0x38, 0x44, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, //
    0xff, 0xff, 0xff, 0x32, 0x64,
];

/// Marker string terminating the container, CONVERT legacy included
pub const END_MARKER: &[u8] = b"   -- CONVERT 2.6 --\r\n\x1a";
