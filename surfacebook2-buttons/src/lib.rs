//! Surface Book 2 button array
//!
//! Identifies the `MSHW0040` firmware node, splits its buttons into a
//! non-repeating and an auto-repeating group, and asks a button-input
//! service for one child device per non-empty group.
//!
//! ```text
//! node ─► DeviceIdentifier ─► GroupBuilder ×2 ─► ButtonInputService
//!              (_DSM)          (ButtonCatalog)      (child devices)
//! ```

pub mod catalog;
pub mod controller;
pub mod error;
pub mod group;
pub mod identify;
pub mod service;

pub use catalog::{
    ButtonCatalog, ButtonDescriptor, EventClass, Polarity, MAX_BUTTONS, SURFACEBOOK2,
    SURFACEBOOK2_BUTTONS, SURFACEBOOK2_GPIO_NAMES,
};
pub use controller::{BindState, ChildSlots, DeviceController};
pub use error::{ButtonError, IdentifyError, Mismatch, ServiceError};
pub use group::{ButtonGroup, GroupBuilder, GroupKind, GROUP_COUNT};
pub use identify::{
    DeviceIdentifier, DeviceIdentity, ACPI_HID, BUS_ID_PREFIX, DSM_FN_DEVICE_ID, DSM_GUID,
    DSM_REVISION, EXPECTED_DEVICE_ID,
};
pub use service::{ButtonInputService, GroupConfig, KeyButton, DEBOUNCE_INTERVAL_MS};
