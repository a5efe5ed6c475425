//! Button catalog - the physical buttons behind the VGBI node
//!
//! Single source of truth for button wiring. The controller never reads
//! this directly; a `ButtonCatalog` is handed to the `GroupBuilder`.

use surfacebook2_acpi::{AcpiGpioMapping, AcpiGpioParams};

/// Upper bound of buttons in one group
pub const MAX_BUTTONS: usize = 3;

/// Linux input event codes used by the catalog
pub mod codes {
    pub const EV_KEY: u16 = 0x01;
    pub const EV_SW: u16 = 0x05;

    pub const KEY_VOLUMEDOWN: u16 = 114;
    pub const KEY_VOLUMEUP: u16 = 115;
    pub const KEY_POWER: u16 = 116;
}

/// Event classification of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Reports `EV_KEY` press/release
    Key,
    /// Reports `EV_SW` state changes (lid, tablet mode, ...)
    Switch,
}

impl EventClass {
    /// Linux event type number
    pub fn ev_type(&self) -> u16 {
        match self {
            EventClass::Key => codes::EV_KEY,
            EventClass::Switch => codes::EV_SW,
        }
    }
}

/// Electrical polarity of a GPIO line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    pub fn is_active_low(&self) -> bool {
        matches!(self, Polarity::ActiveLow)
    }
}

/// One physical button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDescriptor {
    pub name: &'static str,
    /// Index of the GPIO resource in the node's `_CRS`
    pub acpi_index: u32,
    /// Global GPIO line number
    pub gpio: u32,
    pub class: EventClass,
    pub code: u16,
    pub autorepeat: bool,
    pub wakeup: bool,
    pub polarity: Polarity,
}

/// All buttons of the Surface Book 2
pub const SURFACEBOOK2_BUTTONS: &[ButtonDescriptor] = &[
    ButtonDescriptor {
        name: "power",
        acpi_index: 0,
        gpio: 0x01DE,
        class: EventClass::Key,
        code: codes::KEY_POWER,
        autorepeat: false,
        wakeup: true,
        polarity: Polarity::ActiveHigh,
    },
    ButtonDescriptor {
        name: "voldown",
        acpi_index: 2,
        gpio: 0x019E,
        class: EventClass::Key,
        code: codes::KEY_VOLUMEDOWN,
        autorepeat: true,
        wakeup: false,
        polarity: Polarity::ActiveLow,
    },
    ButtonDescriptor {
        name: "volup",
        acpi_index: 4,
        gpio: 0x019F,
        class: EventClass::Key,
        code: codes::KEY_VOLUMEUP,
        autorepeat: true,
        wakeup: false,
        polarity: Polarity::ActiveLow,
    },
];

/// Catalog used for the Surface Book 2
pub const SURFACEBOOK2: ButtonCatalog = ButtonCatalog::new(SURFACEBOOK2_BUTTONS);

/// Human-readable names for the node's GPIO resources
///
/// Informational only: the button groups address lines by number.
pub const SURFACEBOOK2_GPIO_NAMES: &[AcpiGpioMapping] = &[
    AcpiGpioMapping {
        name: "power-gpios",
        params: AcpiGpioParams::new(0, 0, false),
        size: 1,
    },
    AcpiGpioMapping {
        name: "voldown-gpios",
        params: AcpiGpioParams::new(2, 0, false),
        size: 1,
    },
    AcpiGpioMapping {
        name: "volup-gpios",
        params: AcpiGpioParams::new(4, 0, false),
        size: 1,
    },
];

/// Ordered, read-only set of buttons
#[derive(Debug, Clone, Copy)]
pub struct ButtonCatalog {
    buttons: &'static [ButtonDescriptor],
}

impl ButtonCatalog {
    /// Wrap a button table
    ///
    /// # Panics
    /// If a button has an empty name or either group would exceed
    /// `MAX_BUTTONS`. In a `const` this is a compile error.
    pub const fn new(buttons: &'static [ButtonDescriptor]) -> Self {
        let mut i = 0;
        while i < buttons.len() {
            assert!(!buttons[i].name.is_empty(), "button without a name");
            i += 1;
        }
        assert!(
            group_len(buttons, false) <= MAX_BUTTONS,
            "too many non-repeating buttons"
        );
        assert!(
            group_len(buttons, true) <= MAX_BUTTONS,
            "too many repeating buttons"
        );
        Self { buttons }
    }

    /// Catalog with no buttons at all
    pub const fn empty() -> Self {
        Self { buttons: &[] }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ButtonDescriptor> {
        self.buttons.iter()
    }

    /// Buttons whose auto-repeat flag equals `autorepeat`, in catalog order
    pub fn group(&self, autorepeat: bool) -> impl Iterator<Item = &'static ButtonDescriptor> {
        self.buttons.iter().filter(move |b| b.autorepeat == autorepeat)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&'static ButtonDescriptor> {
        self.buttons.iter().find(|b| b.name == name)
    }
}

const fn group_len(buttons: &[ButtonDescriptor], autorepeat: bool) -> usize {
    let mut n = 0;
    let mut i = 0;
    while i < buttons.len() {
        if buttons[i].autorepeat == autorepeat {
            n += 1;
        }
        i += 1;
    }
    n
}
