//! GPIO naming tables exported under the runtime directory
//!
//! Mimics what `acpi_dev_add_driver_gpios` makes visible in kernel logs:
//! `/run/surfacebook2-button/<instance>/gpios` lists one mapping per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use surfacebook2_acpi::{AcpiDevice, AcpiGpioMapping, FirmwareError, GpioNameRegistry};
use tracing::debug;

const GPIOS_FILE: &str = "gpios";

/// `GpioNameRegistry` writing plain-text files
#[derive(Debug, Clone)]
pub struct RuntimeGpioNames {
    base_path: PathBuf,
}

impl RuntimeGpioNames {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the files of one node
    pub fn node_dir(&self, node: &AcpiDevice) -> PathBuf {
        // Instance names contain ':' which is fine on Linux filesystems
        self.base_path.join(node.instance())
    }
}

impl GpioNameRegistry for RuntimeGpioNames {
    fn add_driver_gpios(
        &mut self,
        node: &AcpiDevice,
        table: &'static [AcpiGpioMapping],
    ) -> Result<(), FirmwareError> {
        let dir = self.node_dir(node);
        fs::create_dir_all(&dir)?;

        let path = dir.join(GPIOS_FILE);
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        writeln!(file, "# {} {}", node.hid(), node.path())?;
        for mapping in table {
            writeln!(file, "{}", mapping)?;
        }

        debug!("Wrote {} GPIO names to {}", table.len(), path.display());
        Ok(())
    }

    fn remove_driver_gpios(&mut self, node: &AcpiDevice) -> Result<(), FirmwareError> {
        let dir = self.node_dir(node);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}
