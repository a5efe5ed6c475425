//! ACPI return objects

use std::fmt;

use crate::error::FirmwareError;

/// Object kinds a method evaluation can return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcpiObject {
    Integer(u64),
    String(String),
    Buffer(Vec<u8>),
    /// Packages are kept in their textual form; nothing here needs to walk them
    Package(String),
}

impl AcpiObject {
    /// ACPI type name, as firmware tooling prints it
    pub fn type_name(&self) -> &'static str {
        match self {
            AcpiObject::Integer(_) => "Integer",
            AcpiObject::String(_) => "String",
            AcpiObject::Buffer(_) => "Buffer",
            AcpiObject::Package(_) => "Package",
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            AcpiObject::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Decode a reply read back from `/proc/acpi/call`
    ///
    /// Returns `Ok(None)` when the method produced no object, and an
    /// evaluation error when the module reports one.
    pub fn parse_acpi_call_reply(method: &str, reply: &str) -> Result<Option<Self>, FirmwareError> {
        let reply = reply.trim_matches(|c: char| c == '\0' || c.is_whitespace());

        if reply.is_empty() || reply == "not called" {
            return Ok(None);
        }

        if let Some(reason) = reply.strip_prefix("Error:") {
            return Err(FirmwareError::Evaluation {
                method: method.to_string(),
                reason: reason.trim().to_string(),
            });
        }

        if let Some(hex) = reply.strip_prefix("0x") {
            let value = u64::from_str_radix(hex, 16)
                .map_err(|_| FirmwareError::Parse(format!("bad integer: {reply}")))?;
            return Ok(Some(AcpiObject::Integer(value)));
        }

        if let Some(inner) = reply.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
            return Ok(Some(AcpiObject::String(inner.to_string())));
        }

        if let Some(inner) = reply.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            return parse_buffer(inner).map(|b| Some(AcpiObject::Buffer(b)));
        }

        if reply.starts_with('[') && reply.ends_with(']') {
            return Ok(Some(AcpiObject::Package(reply.to_string())));
        }

        Err(FirmwareError::Parse(format!("unrecognised reply: {reply}")))
    }
}

impl fmt::Display for AcpiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcpiObject::Integer(v) => write!(f, "0x{v:x}"),
            AcpiObject::String(s) => write!(f, "\"{s}\""),
            AcpiObject::Buffer(b) => write!(f, "Buffer[{}]", b.len()),
            AcpiObject::Package(p) => f.write_str(p),
        }
    }
}

fn parse_buffer(inner: &str) -> Result<Vec<u8>, FirmwareError> {
    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let digits = s.strip_prefix("0x").unwrap_or(s);
            u8::from_str_radix(digits, 16)
                .map_err(|_| FirmwareError::Parse(format!("bad buffer byte: {s}")))
        })
        .collect()
}
