//! Unsigned varint (LEB128) encoding used by the legacy amino wire format

/// Encode a u64 as an unsigned varint, appending to `out`
pub fn write_uvarint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Encode a u64 as an unsigned varint
pub fn encode_uvarint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    write_uvarint(value, &mut out);
    out
}
