//! Contract with the button-input service
//!
//! The service turns a group description into a live input device (a
//! `gpio-keys` instance, a uinput device, ...). Event delivery and debounce
//! are its business, not ours.

use crate::catalog::{ButtonDescriptor, EventClass, Polarity};
use crate::error::ServiceError;

/// Debounce applied to every button, in milliseconds
pub const DEBOUNCE_INTERVAL_MS: u32 = 1;

/// One button as handed to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyButton {
    pub class: EventClass,
    pub code: u16,
    pub gpio: u32,
    pub polarity: Polarity,
    pub wakeup: bool,
    /// Display name
    pub desc: &'static str,
    pub debounce_interval_ms: u32,
}

impl From<&ButtonDescriptor> for KeyButton {
    fn from(b: &ButtonDescriptor) -> Self {
        Self {
            class: b.class,
            code: b.code,
            gpio: b.gpio,
            polarity: b.polarity,
            wakeup: b.wakeup,
            desc: b.name,
            debounce_interval_ms: DEBOUNCE_INTERVAL_MS,
        }
    }
}

/// Description of one child device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    /// Buttons in catalog order
    pub buttons: Vec<KeyButton>,
    /// Whether the device auto-repeats held keys
    pub autorepeat: bool,
}

impl GroupConfig {
    /// Short label for logs and device names
    pub fn label(&self) -> &'static str {
        if self.autorepeat {
            "autorepeat"
        } else {
            "single"
        }
    }

    pub fn descriptions(&self) -> Vec<&'static str> {
        self.buttons.iter().map(|b| b.desc).collect()
    }
}

/// Creates and tears down child input devices
///
/// Calls are synchronous and never re-entered for the same controller.
pub trait ButtonInputService {
    /// Opaque handle to a created child
    type Handle;

    /// Create one child for `config`
    ///
    /// Either returns a live handle or leaves nothing behind.
    fn create(&mut self, config: &GroupConfig) -> Result<Self::Handle, ServiceError>;

    /// Tear a child down
    fn release(&mut self, handle: Self::Handle) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SURFACEBOOK2;

    #[test]
    fn test_key_button_from_descriptor() {
        let volup = SURFACEBOOK2.find("volup").unwrap();
        let key = KeyButton::from(volup);
        assert_eq!(key.desc, "volup");
        assert_eq!(key.gpio, 0x019F);
        assert_eq!(key.polarity, Polarity::ActiveLow);
        assert_eq!(key.debounce_interval_ms, 1);
    }
}
