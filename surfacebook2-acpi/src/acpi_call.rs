//! `_DSM` evaluation through the `acpi_call` kernel module
//!
//! The module exposes `/proc/acpi/call`: a method invocation is written to
//! it and the result is read back as text.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use uuid::Uuid;

use crate::device::AcpiDevice;
use crate::error::FirmwareError;
use crate::guid::to_acpi_call_buffer;
use crate::object::AcpiObject;
use crate::DsmQuery;

/// Default location of the `acpi_call` interface
pub const ACPI_CALL_PATH: &str = "/proc/acpi/call";

/// `DsmQuery` backed by `/proc/acpi/call`
#[derive(Debug, Clone)]
pub struct AcpiCall {
    path: PathBuf,
}

impl Default for AcpiCall {
    fn default() -> Self {
        Self::new(ACPI_CALL_PATH)
    }
}

impl AcpiCall {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the interface is present
    pub fn is_available(&self) -> bool {
        self.path.exists()
    }

    /// Command line understood by `acpi_call` for a `_DSM` invocation
    ///
    /// The fourth argument is an empty integer; `acpi_call` cannot build
    /// packages and firmware that takes no arguments ignores it.
    pub fn dsm_command(node: &AcpiDevice, guid: &Uuid, revision: u64, function: u64) -> String {
        format!(
            "{}._DSM {} 0x{:x} 0x{:x} 0x0",
            node.path(),
            to_acpi_call_buffer(guid),
            revision,
            function
        )
    }

    fn call(&self, method: &str, command: &str) -> Result<Option<AcpiObject>, FirmwareError> {
        if !self.is_available() {
            return Err(FirmwareError::Unavailable(self.path.clone()));
        }

        trace!("acpi_call <- {}", command);
        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        file.write_all(command.as_bytes())?;
        drop(file);

        let reply = fs::read_to_string(&self.path)?;
        trace!("acpi_call -> {}", reply.trim_end_matches('\0'));

        AcpiObject::parse_acpi_call_reply(method, &reply)
    }
}

impl DsmQuery for AcpiCall {
    fn evaluate_dsm(
        &self,
        node: &AcpiDevice,
        guid: &Uuid,
        revision: u64,
        function: u64,
    ) -> Result<Option<AcpiObject>, FirmwareError> {
        let method = format!("{}._DSM", node.path());
        let command = Self::dsm_command(node, guid, revision, function);
        debug!(
            "Evaluating {} (guid {}, rev {}, fn {})",
            method, guid, revision, function
        );
        self.call(&method, &command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GUID: Uuid = Uuid::from_fields(
        0x6fd05c69,
        0xcde3,
        0x49f4,
        &[0x95, 0xed, 0xab, 0x16, 0x65, 0x49, 0x80, 0x35],
    );

    fn node() -> AcpiDevice {
        AcpiDevice::new("MSHW0040:00", "MSHW0040", "\\_SB_.VGBI")
    }

    #[test]
    fn test_dsm_command() {
        let cmd = AcpiCall::dsm_command(&node(), &GUID, 1, 2);
        assert!(cmd.starts_with("\\_SB_.VGBI._DSM {0x69,0x5c,"));
        assert!(cmd.ends_with("} 0x1 0x2 0x0"));
    }

    #[test]
    fn test_missing_interface() {
        let tmp = tempfile::tempdir().unwrap();
        let call = AcpiCall::new(tmp.path().join("call"));
        assert!(!call.is_available());
        assert!(matches!(
            call.evaluate_dsm(&node(), &GUID, 1, 2),
            Err(FirmwareError::Unavailable(_))
        ));
    }

    #[test]
    fn test_reads_back_reply() {
        // A regular file stands in for the proc node: the write replaces the
        // contents and the read returns the command text, which is not a
        // valid reply.
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("call");
        fs::write(&path, "").unwrap();

        let call = AcpiCall::new(&path);
        assert!(matches!(
            call.evaluate_dsm(&node(), &GUID, 1, 2),
            Err(FirmwareError::Parse(_))
        ));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("._DSM"));
    }
}
