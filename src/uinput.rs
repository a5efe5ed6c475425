//! Button groups as uinput virtual devices
//!
//! Each group becomes one virtual input device declaring the group's key
//! and switch codes, so it shows up in `evtest` like a `gpio-keys` child.

use std::io;
use std::path::PathBuf;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, BusType, InputId, Key, SwitchType,
};
use surfacebook2_buttons::{ButtonInputService, EventClass, GroupConfig, ServiceError};
use tracing::{debug, info};

/// Host-bus identity reported by the virtual devices (Microsoft vendor id)
const VENDOR_MICROSOFT: u16 = 0x045e;
const PRODUCT_BUTTON_ARRAY: u16 = 0x0040;

/// A live child device
pub struct UinputChild {
    device: VirtualDevice,
    name: String,
    autorepeat: bool,
    buttons: Vec<&'static str>,
}

impl UinputChild {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn autorepeat(&self) -> bool {
        self.autorepeat
    }

    /// Button names in catalog order
    pub fn buttons(&self) -> &[&'static str] {
        &self.buttons
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl std::fmt::Debug for UinputChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputChild")
            .field("name", &self.name)
            .field("autorepeat", &self.autorepeat)
            .field("buttons", &self.buttons)
            .finish()
    }
}

/// `ButtonInputService` creating one uinput device per group
#[derive(Debug, Clone)]
pub struct UinputButtonService {
    device_name: String,
    created: usize,
}

impl UinputButtonService {
    /// # Arguments
    /// * `device_name` - Prefix of the device names (shown in `evtest`)
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            created: 0,
        }
    }

    /// Name given to the child for `config`
    pub fn child_name(&self, config: &GroupConfig) -> String {
        format!("{} ({})", self.device_name, config.label())
    }

    /// Children currently alive
    pub fn live(&self) -> usize {
        self.created
    }

    fn build(&self, name: &str, config: &GroupConfig) -> io::Result<VirtualDevice> {
        let mut keys = AttributeSet::<Key>::new();
        let mut switches = AttributeSet::<SwitchType>::new();

        for button in &config.buttons {
            debug!(
                "{}: {} code={} gpio=0x{:x} active_low={} wakeup={} debounce={}ms",
                name,
                button.desc,
                button.code,
                button.gpio,
                button.polarity.is_active_low(),
                button.wakeup,
                button.debounce_interval_ms
            );
            match button.class {
                EventClass::Key => keys.insert(Key::new(button.code)),
                EventClass::Switch => switches.insert(SwitchType(button.code)),
            }
        }

        // EV_REP is not settable through this builder; autorepeat is only
        // recorded on the child.
        let mut builder = VirtualDeviceBuilder::new()?
            .name(name)
            .input_id(InputId::new(
                BusType::BUS_HOST,
                VENDOR_MICROSOFT,
                PRODUCT_BUTTON_ARRAY,
                1,
            ));

        if keys.iter().next().is_some() {
            builder = builder.with_keys(&keys)?;
        }
        if switches.iter().next().is_some() {
            builder = builder.with_switches(&switches)?;
        }

        builder.build()
    }
}

fn service_error(e: io::Error) -> ServiceError {
    if e.kind() == io::ErrorKind::OutOfMemory {
        ServiceError::OutOfMemory
    } else {
        ServiceError::Registration(e.to_string())
    }
}

impl ButtonInputService for UinputButtonService {
    type Handle = UinputChild;

    fn create(&mut self, config: &GroupConfig) -> Result<UinputChild, ServiceError> {
        let name = self.child_name(config);
        let device = self.build(&name, config).map_err(service_error)?;

        let mut child = UinputChild {
            device,
            name,
            autorepeat: config.autorepeat,
            buttons: config.descriptions(),
        };
        self.created += 1;

        match child.device_path() {
            Some(path) => info!("Created {} at {}", child.name, path.display()),
            None => info!("Created {}", child.name),
        }
        Ok(child)
    }

    fn release(&mut self, handle: UinputChild) -> Result<(), ServiceError> {
        debug!("Destroying {}", handle.name);
        // Dropping the device closes the uinput fd, which destroys it
        drop(handle);
        self.created = self.created.saturating_sub(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfacebook2_buttons::{GroupBuilder, GroupKind, SURFACEBOOK2};

    #[test]
    fn test_child_names() {
        let svc = UinputButtonService::new("SB2");
        let single = GroupConfig {
            buttons: vec![],
            autorepeat: false,
        };
        let repeat = GroupConfig {
            buttons: vec![],
            autorepeat: true,
        };
        assert_eq!(svc.child_name(&single), "SB2 (single)");
        assert_eq!(svc.child_name(&repeat), "SB2 (autorepeat)");
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            service_error(io::Error::from(io::ErrorKind::OutOfMemory)),
            ServiceError::OutOfMemory
        );
        assert!(matches!(
            service_error(io::Error::from(io::ErrorKind::PermissionDenied)),
            ServiceError::Registration(_)
        ));
    }

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn test_create_groups() {
        let mut svc = UinputButtonService::new("SB2 Test Buttons");
        let builder = GroupBuilder::new(SURFACEBOOK2);

        let repeat = builder
            .build_group(&mut svc, GroupKind::Repeating)
            .unwrap()
            .unwrap();
        assert!(repeat.autorepeat());
        assert_eq!(repeat.buttons(), ["voldown", "volup"]);
        assert_eq!(svc.live(), 1);

        svc.release(repeat).unwrap();
        assert_eq!(svc.live(), 0);
    }
}
