//! Bind/unbind lifecycle of one button array node
//!
//! `add()` either leaves the controller `Bound` with at least one child, or
//! `Unbound` with nothing retained. `remove()` never fails.

use surfacebook2_acpi::{AcpiDevice, AcpiGpioMapping, DsmQuery, GpioNameRegistry};
use tracing::{debug, info, warn};

use crate::catalog::{ButtonCatalog, SURFACEBOOK2_GPIO_NAMES};
use crate::error::ButtonError;
use crate::group::{GroupBuilder, GroupKind, GROUP_COUNT};
use crate::identify::DeviceIdentifier;
use crate::service::ButtonInputService;

/// Lifecycle state of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    Binding,
    Bound,
    Unbinding,
}

/// One optional child per group, indexed by `GroupKind::slot`
#[derive(Debug)]
pub struct ChildSlots<H> {
    slots: [Option<H>; GROUP_COUNT],
}

impl<H> Default for ChildSlots<H> {
    fn default() -> Self {
        Self {
            slots: [None, None],
        }
    }
}

impl<H> ChildSlots<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: GroupKind) -> Option<&H> {
        self.slots[kind.slot()].as_ref()
    }

    /// Store a child, handing back whatever occupied the slot
    pub fn insert(&mut self, kind: GroupKind, handle: H) -> Option<H> {
        self.slots[kind.slot()].replace(handle)
    }

    /// Number of populated slots
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.populated() == 0
    }

    /// Release every populated slot in slot order
    ///
    /// Release failures are logged and otherwise ignored. Returns the number
    /// of children handed back to the service.
    pub fn release_all<S>(&mut self, service: &mut S) -> usize
    where
        S: ButtonInputService<Handle = H>,
    {
        let mut released = 0;
        for (slot, child) in self.slots.iter_mut().enumerate() {
            if let Some(handle) = child.take() {
                if let Err(e) = service.release(handle) {
                    warn!("Failed to release child in slot {}: {}", slot, e);
                }
                released += 1;
            }
        }
        released
    }
}

/// Driver instance bound to one firmware node
pub struct DeviceController<Q, S, R>
where
    Q: DsmQuery,
    S: ButtonInputService,
    R: GpioNameRegistry,
{
    identifier: DeviceIdentifier<Q>,
    builder: GroupBuilder,
    service: S,
    gpio_names: R,
    gpio_table: &'static [AcpiGpioMapping],
    children: ChildSlots<S::Handle>,
    state: BindState,
    node: Option<AcpiDevice>,
}

impl<Q, S, R> DeviceController<Q, S, R>
where
    Q: DsmQuery,
    S: ButtonInputService,
    R: GpioNameRegistry,
{
    /// Create an unbound controller
    ///
    /// # Arguments
    /// * `query` - `_DSM` evaluation backend
    /// * `catalog` - buttons to expose
    /// * `service` - creates the child input devices
    /// * `gpio_names` - receives the GPIO naming table once bound
    pub fn new(query: Q, catalog: ButtonCatalog, service: S, gpio_names: R) -> Self {
        Self {
            identifier: DeviceIdentifier::new(query),
            builder: GroupBuilder::new(catalog),
            service,
            gpio_names,
            gpio_table: SURFACEBOOK2_GPIO_NAMES,
            children: ChildSlots::new(),
            state: BindState::Unbound,
            node: None,
        }
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    pub fn is_bound(&self) -> bool {
        self.state == BindState::Bound
    }

    /// Node this controller is bound to
    pub fn node(&self) -> Option<&AcpiDevice> {
        self.node.as_ref()
    }

    pub fn children(&self) -> &ChildSlots<S::Handle> {
        &self.children
    }

    pub fn child(&self, kind: GroupKind) -> Option<&S::Handle> {
        self.children.get(kind)
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    pub fn gpio_names(&self) -> &R {
        &self.gpio_names
    }

    pub fn identifier(&self) -> &DeviceIdentifier<Q> {
        &self.identifier
    }

    /// Bind to `node`
    ///
    /// Returns `NotThisDevice` when the node is not a Surface Book 2 button
    /// array. On any other error every child created during this call has
    /// been released again.
    pub fn add(&mut self, node: &AcpiDevice) -> Result<(), ButtonError> {
        if self.state != BindState::Unbound {
            return Err(ButtonError::InvalidState(self.state));
        }
        self.state = BindState::Binding;

        match self.identifier.check(node) {
            Ok(id) => debug!("{}: device id 0x{:x}", node.instance(), id),
            Err(mismatch) => {
                debug!("{}: not ours ({})", node.instance(), mismatch);
                self.state = BindState::Unbound;
                return Err(mismatch.into());
            }
        }

        for kind in GroupKind::BUILD_ORDER {
            match self.builder.build_group(&mut self.service, kind) {
                Ok(Some(handle)) => {
                    self.children.insert(kind, handle);
                }
                Ok(None) => {}
                Err(e) => {
                    let released = self.children.release_all(&mut self.service);
                    warn!(
                        "{}: {} group failed ({}), released {} child(ren)",
                        node.instance(),
                        kind,
                        e,
                        released
                    );
                    self.state = BindState::Unbound;
                    return Err(e);
                }
            }
        }

        if self.children.is_empty() {
            self.state = BindState::Unbound;
            return Err(ButtonError::NoMatchingButtons);
        }

        // Diagnostic only
        if let Err(e) = self.gpio_names.add_driver_gpios(node, self.gpio_table) {
            warn!("{}: could not register GPIO names: {}", node.instance(), e);
        }

        self.node = Some(node.clone());
        self.state = BindState::Bound;
        info!(
            "{}: bound with {} child device(s)",
            node.instance(),
            self.children.populated()
        );
        Ok(())
    }

    /// Release everything and return to `Unbound`
    ///
    /// Safe on a controller that never bound, and safe to repeat.
    pub fn remove(&mut self) {
        self.state = BindState::Unbinding;

        let released = self.children.release_all(&mut self.service);

        if let Some(node) = self.node.take() {
            if let Err(e) = self.gpio_names.remove_driver_gpios(&node) {
                warn!("{}: could not remove GPIO names: {}", node.instance(), e);
            }
            info!("{}: unbound, released {} child(ren)", node.instance(), released);
        }

        self.state = BindState::Unbound;
    }
}

impl<Q, S, R> Drop for DeviceController<Q, S, R>
where
    Q: DsmQuery,
    S: ButtonInputService,
    R: GpioNameRegistry,
{
    fn drop(&mut self) {
        if self.state != BindState::Unbound || !self.children.is_empty() {
            self.remove();
        }
    }
}
