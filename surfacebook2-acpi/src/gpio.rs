//! Driver-supplied GPIO naming tables
//!
//! A driver can describe which `GpioInt`/`GpioIo` resources of its node
//! carry which function. The table is informational only.

use std::fmt;

use crate::device::AcpiDevice;
use crate::error::FirmwareError;

/// Reference to one GPIO line inside a node's `_CRS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiGpioParams {
    /// Index of the GPIO resource in `_CRS`
    pub crs_entry_index: u32,
    /// Line within that resource
    pub line_index: u32,
    pub active_low: bool,
}

impl AcpiGpioParams {
    pub const fn new(crs_entry_index: u32, line_index: u32, active_low: bool) -> Self {
        Self {
            crs_entry_index,
            line_index,
            active_low,
        }
    }
}

/// Function name bound to a set of GPIO lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiGpioMapping {
    /// Connection id, e.g. `power-gpios`
    pub name: &'static str,
    pub params: AcpiGpioParams,
    /// Number of consecutive lines described
    pub size: u32,
}

impl fmt::Display for AcpiGpioMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} crs={} line={} active_{} size={}",
            self.name,
            self.params.crs_entry_index,
            self.params.line_index,
            if self.params.active_low { "low" } else { "high" },
            self.size
        )
    }
}

/// Sink for driver GPIO naming tables
pub trait GpioNameRegistry {
    /// Attach a naming table to a node
    fn add_driver_gpios(
        &mut self,
        node: &AcpiDevice,
        table: &'static [AcpiGpioMapping],
    ) -> Result<(), FirmwareError>;

    /// Withdraw whatever table was attached to a node
    fn remove_driver_gpios(&mut self, node: &AcpiDevice) -> Result<(), FirmwareError>;
}

/// Registry that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGpioNames;

impl GpioNameRegistry for NoGpioNames {
    fn add_driver_gpios(
        &mut self,
        _node: &AcpiDevice,
        _table: &'static [AcpiGpioMapping],
    ) -> Result<(), FirmwareError> {
        Ok(())
    }

    fn remove_driver_gpios(&mut self, _node: &AcpiDevice) -> Result<(), FirmwareError> {
        Ok(())
    }
}
