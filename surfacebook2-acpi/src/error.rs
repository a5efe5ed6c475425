//! Firmware access error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to ACPI firmware
#[derive(Error, Debug)]
pub enum FirmwareError {
    /// The method-evaluation interface is not present (e.g. `acpi_call` not loaded)
    #[error("ACPI call interface unavailable: {}", .0.display())]
    Unavailable(PathBuf),

    /// The device node does not exist on the bus
    #[error("ACPI device not found: {0}")]
    DeviceNotFound(String),

    /// A sysfs attribute was missing or malformed
    #[error("Invalid sysfs attribute {attr} for {device}")]
    InvalidAttribute { device: String, attr: &'static str },

    /// Firmware rejected or failed the evaluation
    #[error("Evaluation of {method} failed: {reason}")]
    Evaluation { method: String, reason: String },

    /// Could not decode the reply of an evaluation
    #[error("Malformed ACPI reply: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
