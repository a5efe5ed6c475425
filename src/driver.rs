//! Driver registration and platform enumeration
//!
//! Plays the role of the ACPI bus: walks the enumerated devices, offers
//! every node whose `_HID` is in the driver's id table to a fresh
//! controller, and tears all bound controllers down on unregister.

use surfacebook2_acpi::{AcpiBus, AcpiCall, AcpiDevice, DsmQuery, FirmwareError, GpioNameRegistry};
use surfacebook2_buttons::{ButtonInputService, DeviceController, ACPI_HID, SURFACEBOOK2};
use tracing::{debug, error, info};

use crate::config::DriverConfig;
use crate::gpio_names::RuntimeGpioNames;
use crate::uinput::UinputButtonService;

/// Static description of an ACPI driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcpiDriver {
    pub name: &'static str,
    pub class: &'static str,
    /// `_HID`s this driver is offered
    pub ids: &'static [&'static str],
}

impl AcpiDriver {
    pub fn matches(&self, node: &AcpiDevice) -> bool {
        self.ids.contains(&node.hid())
    }
}

/// The Surface Book 2 button array driver
pub const SURFACEBOOK2_BUTTON_DRIVER: AcpiDriver = AcpiDriver {
    name: "surfacebook2_button",
    class: "hotkey",
    ids: &[ACPI_HID],
};

/// Controller wired to the real host interfaces
pub type HostController = DeviceController<AcpiCall, UinputButtonService, RuntimeGpioNames>;

type Factory<Q, S, R> = Box<dyn FnMut(&AcpiDevice) -> DeviceController<Q, S, R>>;

/// Binds controllers to matching nodes
pub struct Platform<Q, S, R>
where
    Q: DsmQuery,
    S: ButtonInputService,
    R: GpioNameRegistry,
{
    driver: AcpiDriver,
    bus: AcpiBus,
    factory: Factory<Q, S, R>,
    bound: Vec<DeviceController<Q, S, R>>,
}

impl<Q, S, R> Platform<Q, S, R>
where
    Q: DsmQuery,
    S: ButtonInputService,
    R: GpioNameRegistry,
{
    /// # Arguments
    /// * `driver` - id table and metadata
    /// * `bus` - where to enumerate nodes
    /// * `factory` - builds an unbound controller for a node
    pub fn new(
        driver: AcpiDriver,
        bus: AcpiBus,
        factory: impl FnMut(&AcpiDevice) -> DeviceController<Q, S, R> + 'static,
    ) -> Self {
        Self {
            driver,
            bus,
            factory: Box::new(factory),
            bound: Vec::new(),
        }
    }

    pub fn driver(&self) -> &AcpiDriver {
        &self.driver
    }

    /// Nodes whose `_HID` is in the id table
    pub fn candidates(&self) -> Result<Vec<AcpiDevice>, FirmwareError> {
        Ok(self
            .bus
            .devices()?
            .into_iter()
            .filter(|d| self.driver.matches(d))
            .collect())
    }

    /// Whether a controller is already bound to `node`
    pub fn is_bound(&self, node: &AcpiDevice) -> bool {
        self.bound
            .iter()
            .any(|c| c.node().is_some_and(|n| n.instance() == node.instance()))
    }

    /// Offer one node to a fresh controller
    ///
    /// Returns `true` if the node was bound by this call. Nodes that already
    /// have a controller are skipped.
    pub fn probe(&mut self, node: &AcpiDevice) -> bool {
        if self.is_bound(node) {
            debug!("{}: already bound", node.instance());
            return false;
        }

        let mut controller = (self.factory)(node);
        match controller.add(node) {
            Ok(()) => {
                self.bound.push(controller);
                true
            }
            Err(e) if e.is_not_this_device() => {
                debug!("{}: {}", node.instance(), e);
                false
            }
            Err(e) => {
                error!("{}: probe failed: {}", node.instance(), e);
                false
            }
        }
    }

    /// Bind every matching node; returns how many were newly bound
    pub fn register(&mut self) -> Result<usize, FirmwareError> {
        let candidates = self.candidates()?;
        info!(
            "{}: {} candidate node(s) for {:?}",
            self.driver.name,
            candidates.len(),
            self.driver.ids
        );

        let mut count = 0;
        for node in &candidates {
            if self.probe(node) {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Remove every bound controller
    pub fn unregister(&mut self) {
        for mut controller in self.bound.drain(..) {
            controller.remove();
        }
        info!("{}: unregistered", self.driver.name);
    }

    pub fn bound(&self) -> &[DeviceController<Q, S, R>] {
        &self.bound
    }
}

/// Platform talking to sysfs, `acpi_call` and uinput
pub fn host_platform(
    config: &DriverConfig,
) -> Platform<AcpiCall, UinputButtonService, RuntimeGpioNames> {
    let acpi_call = config.acpi_call_path.clone();
    let runtime_dir = config.runtime_dir.clone();
    let device_name = config.device_name.clone();

    Platform::new(
        SURFACEBOOK2_BUTTON_DRIVER,
        AcpiBus::new(&config.sysfs_root),
        move |_node: &AcpiDevice| -> HostController {
            DeviceController::new(
                AcpiCall::new(&acpi_call),
                SURFACEBOOK2,
                UinputButtonService::new(&device_name),
                RuntimeGpioNames::new(&runtime_dir),
            )
        },
    )
}
