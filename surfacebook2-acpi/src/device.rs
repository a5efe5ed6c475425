//! ACPI device nodes and their discovery through sysfs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FirmwareError;

/// Where the kernel exposes enumerated ACPI devices
pub const SYSFS_ACPI_DEVICES: &str = "/sys/bus/acpi/devices";

/// A firmware-described device node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcpiDevice {
    /// Bus instance name (e.g. `MSHW0040:00`)
    instance: String,
    /// Hardware id (`_HID`)
    hid: String,
    /// Full namespace path (e.g. `\_SB_.VGBI`)
    path: String,
}

impl AcpiDevice {
    pub fn new(
        instance: impl Into<String>,
        hid: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            instance: instance.into(),
            hid: hid.into(),
            path: path.into(),
        }
    }

    /// Read a device from its sysfs directory
    pub fn from_sysfs(dir: &Path) -> Result<Self, FirmwareError> {
        let instance = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| FirmwareError::DeviceNotFound(dir.display().to_string()))?;

        let hid = read_attr(dir, &instance, "hid")?;
        let path = read_attr(dir, &instance, "path")?;

        Ok(Self::new(instance, hid, path))
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn hid(&self) -> &str {
        &self.hid
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Bus id: the last four-character segment of the namespace path
    pub fn bus_id(&self) -> &str {
        self.path
            .rsplit(&['.', '\\'][..])
            .next()
            .unwrap_or(&self.path)
    }
}

fn read_attr(dir: &Path, instance: &str, attr: &'static str) -> Result<String, FirmwareError> {
    let value = fs::read_to_string(dir.join(attr)).map_err(|_| FirmwareError::InvalidAttribute {
        device: instance.to_string(),
        attr,
    })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(FirmwareError::InvalidAttribute {
            device: instance.to_string(),
            attr,
        });
    }
    Ok(value.to_string())
}

/// View of the ACPI bus as exported in sysfs
#[derive(Debug, Clone)]
pub struct AcpiBus {
    root: PathBuf,
}

impl Default for AcpiBus {
    fn default() -> Self {
        Self::new(SYSFS_ACPI_DEVICES)
    }
}

impl AcpiBus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List every device node that has both a `_HID` and a namespace path
    pub fn devices(&self) -> Result<Vec<AcpiDevice>, FirmwareError> {
        let mut devices = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let dir = entry?.path();
            match AcpiDevice::from_sysfs(&dir) {
                Ok(dev) => devices.push(dev),
                Err(e) => debug!("Skipping {}: {}", dir.display(), e),
            }
        }

        devices.sort_by(|a, b| a.instance.cmp(&b.instance));
        Ok(devices)
    }

    /// Devices whose `_HID` appears in `ids`
    pub fn matching(&self, ids: &[&str]) -> Result<Vec<AcpiDevice>, FirmwareError> {
        Ok(self
            .devices()?
            .into_iter()
            .filter(|d| ids.contains(&d.hid()))
            .collect())
    }

    /// Look up a single device by instance name
    pub fn find(&self, instance: &str) -> Result<AcpiDevice, FirmwareError> {
        let dir = self.root.join(instance);
        if !dir.is_dir() {
            return Err(FirmwareError::DeviceNotFound(instance.to_string()));
        }
        AcpiDevice::from_sysfs(&dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_device(root: &Path, instance: &str, hid: &str, path: Option<&str>) {
        let dir = root.join(instance);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("hid"), format!("{hid}\n")).unwrap();
        if let Some(path) = path {
            fs::write(dir.join("path"), format!("{path}\n")).unwrap();
        }
    }

    #[test]
    fn test_bus_id() {
        let dev = AcpiDevice::new("MSHW0040:00", "MSHW0040", "\\_SB_.VGBI");
        assert_eq!(dev.bus_id(), "VGBI");

        let root = AcpiDevice::new("LNXSYSTM:00", "LNXSYSTM", "\\");
        assert_eq!(root.bus_id(), "");
    }

    #[test]
    fn test_scan_sysfs() {
        let tmp = tempfile::tempdir().unwrap();
        fake_device(tmp.path(), "MSHW0040:00", "MSHW0040", Some("\\_SB_.VGBI"));
        fake_device(tmp.path(), "PNP0C0C:00", "PNP0C0C", Some("\\_SB_.PWRB"));
        // No handle, no path attribute
        fake_device(tmp.path(), "LNXPWRBN:00", "LNXPWRBN", None);

        let bus = AcpiBus::new(tmp.path());
        let devices = bus.devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].instance(), "MSHW0040:00");

        let matching = bus.matching(&["MSHW0040"]).unwrap();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].path(), "\\_SB_.VGBI");
    }

    #[test]
    fn test_find() {
        let tmp = tempfile::tempdir().unwrap();
        fake_device(tmp.path(), "MSHW0040:00", "MSHW0040", Some("\\_SB_.VGBI"));

        let bus = AcpiBus::new(tmp.path());
        assert_eq!(bus.find("MSHW0040:00").unwrap().hid(), "MSHW0040");
        assert!(matches!(
            bus.find("MSHW0040:01"),
            Err(FirmwareError::DeviceNotFound(_))
        ));
    }
}
