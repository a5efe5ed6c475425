//! ACPI access for the Surface Book 2 button array
//!
//! This crate covers the firmware side of the driver:
//!
//! - device nodes as enumerated in sysfs (`AcpiDevice`, `AcpiBus`)
//! - `_DSM` evaluation (`DsmQuery`, with the `acpi_call` backend)
//! - GUIDs and returned objects
//! - driver GPIO naming tables

pub mod acpi_call;
pub mod device;
pub mod error;
pub mod gpio;
pub mod guid;
pub mod object;

pub use acpi_call::{AcpiCall, ACPI_CALL_PATH};
pub use device::{AcpiBus, AcpiDevice, SYSFS_ACPI_DEVICES};
pub use error::FirmwareError;
pub use gpio::{AcpiGpioMapping, AcpiGpioParams, GpioNameRegistry, NoGpioNames};
pub use guid::to_acpi_call_buffer;
pub use object::AcpiObject;
pub use uuid::Uuid;

/// Evaluation of a node's device-specific method (`_DSM`)
///
/// Calls are synchronous and may block for as long as firmware takes.
pub trait DsmQuery {
    /// Evaluate `_DSM(guid, revision, function, <empty>)` on `node`
    ///
    /// # Returns
    /// * `Err(_)` - the query interface could not be reached
    /// * `Ok(None)` - the method ran but produced no object
    /// * `Ok(Some(obj))` - the returned object
    fn evaluate_dsm(
        &self,
        node: &AcpiDevice,
        guid: &Uuid,
        revision: u64,
        function: u64,
    ) -> Result<Option<AcpiObject>, FirmwareError>;
}

impl<T: DsmQuery + ?Sized> DsmQuery for &T {
    fn evaluate_dsm(
        &self,
        node: &AcpiDevice,
        guid: &Uuid,
        revision: u64,
        function: u64,
    ) -> Result<Option<AcpiObject>, FirmwareError> {
        (**self).evaluate_dsm(node, guid, revision, function)
    }
}
