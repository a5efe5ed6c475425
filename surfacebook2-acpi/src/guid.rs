//! ACPI GUIDs (`_DSM` UUIDs)
//!
//! Firmware takes GUIDs in the mixed-endian layout: the first three fields
//! little-endian, the trailing eight bytes as-is. That is
//! `Uuid::to_bytes_le()`.

use uuid::Uuid;

/// Buffer literal accepted by the `acpi_call` module, e.g. `{0x69,0x5c,...}`
pub fn to_acpi_call_buffer(guid: &Uuid) -> String {
    let bytes: Vec<String> = guid
        .to_bytes_le()
        .iter()
        .map(|b| format!("0x{b:02x}"))
        .collect();
    format!("{{{}}}", bytes.join(","))
}
