//! HID report format
//!
//! ```text
//! BYTE0     BYTE1
//! XXXXXXXX  XXXXXXXX
//! 76543210  FEDCBA98
//! X - axis value 0-65535, little-endian
//! ```

/// Length of one input report in bytes
pub const REPORT_LEN: usize = 2;

/// Report descriptor: a joystick with one 16-bit absolute X axis
pub const REPORT_DESCRIPTOR: [u8; 31] = [
    0x05, 0x01, // USAGE_PAGE (Generic Desktop)
    0x15, 0x00, // LOGICAL_MINIMUM (0)
    0x09, 0x04, // USAGE (Joystick)
    0xa1, 0x01, // COLLECTION (Application)
    0x05, 0x01, //   USAGE_PAGE (Generic Desktop)
    0x09, 0x01, //   USAGE (Pointer)
    0xa1, 0x00, //   COLLECTION (Physical)
    0x09, 0x30, //     USAGE (X)
    0x27, 0xff, 0xff, 0x00, 0x00, //     LOGICAL_MAXIMUM (65535)
    0x15, 0x00, //     LOGICAL_MINIMUM (0)
    0x75, 0x10, //     REPORT_SIZE (16)
    0x95, 0x01, //     REPORT_COUNT (1)
    0x81, 0x02, //     INPUT (Data,Var,Abs)
    0xc0, //   END_COLLECTION
    0xc0, // END_COLLECTION
];

/// Encodes an axis value as a wire report
pub const fn build(value: u16) -> [u8; REPORT_LEN] {
    value.to_le_bytes()
}

/// Inverse of [`build`], for host-side readers
pub const fn decode(report: [u8; REPORT_LEN]) -> u16 {
    u16::from_le_bytes(report)
}
