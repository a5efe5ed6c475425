//! Partitioning of the catalog into delivery groups
//!
//! Volume keys want auto-repeat while the power button must not repeat, so
//! the buttons are split over two child devices by their auto-repeat flag.

use std::fmt;

use tracing::debug;

use crate::catalog::{ButtonCatalog, ButtonDescriptor, MAX_BUTTONS};
use crate::error::ButtonError;
use crate::service::{ButtonInputService, GroupConfig, KeyButton};

/// Number of groups (and child slots)
pub const GROUP_COUNT: usize = 2;

/// Group selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Buttons that report each press once
    Single,
    /// Buttons that auto-repeat while held
    Repeating,
}

impl GroupKind {
    /// Groups in the order they are built
    pub const BUILD_ORDER: [GroupKind; GROUP_COUNT] = [GroupKind::Single, GroupKind::Repeating];

    pub fn autorepeat(&self) -> bool {
        matches!(self, GroupKind::Repeating)
    }

    /// Child slot owned by this group
    pub fn slot(&self) -> usize {
        match self {
            GroupKind::Single => 0,
            GroupKind::Repeating => 1,
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupKind::Single => "single",
            GroupKind::Repeating => "autorepeat",
        })
    }
}

/// Borrowed view of the catalog entries belonging to one group
#[derive(Debug)]
pub struct ButtonGroup<'a> {
    buttons: Vec<&'a ButtonDescriptor>,
    autorepeat: bool,
}

impl ButtonGroup<'static> {
    /// Select the buttons of `catalog` matching `kind`
    pub fn select(catalog: &ButtonCatalog, kind: GroupKind) -> Result<Self, ButtonError> {
        let mut buttons = Vec::new();
        buttons
            .try_reserve_exact(MAX_BUTTONS)
            .map_err(|_| ButtonError::ResourceExhausted)?;
        buttons.extend(catalog.group(kind.autorepeat()));

        Ok(ButtonGroup {
            buttons,
            autorepeat: kind.autorepeat(),
        })
    }
}

impl<'a> ButtonGroup<'a> {
    pub fn autorepeat(&self) -> bool {
        self.autorepeat
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ButtonDescriptor> + '_ {
        self.buttons.iter().copied()
    }

    /// Delivery configuration handed to the button-input service
    pub fn to_config(&self) -> Result<GroupConfig, ButtonError> {
        let mut keys = Vec::new();
        keys.try_reserve_exact(self.buttons.len())
            .map_err(|_| ButtonError::ResourceExhausted)?;

        for info in &self.buttons {
            debug!("Registering button {}", info.name);
            keys.push(KeyButton::from(*info));
        }

        Ok(GroupConfig {
            buttons: keys,
            autorepeat: self.autorepeat,
        })
    }
}

/// Builds one child device per non-empty group
#[derive(Debug, Clone, Copy)]
pub struct GroupBuilder {
    catalog: ButtonCatalog,
}

impl GroupBuilder {
    pub fn new(catalog: ButtonCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ButtonCatalog {
        &self.catalog
    }

    /// Create the child for `kind`
    ///
    /// # Returns
    /// * `Ok(None)` - no button belongs to the group
    /// * `Ok(Some(handle))` - the child now exists
    /// * `Err(_)` - nothing was created
    pub fn build_group<S: ButtonInputService>(
        &self,
        service: &mut S,
        kind: GroupKind,
    ) -> Result<Option<S::Handle>, ButtonError> {
        let group = ButtonGroup::select(&self.catalog, kind)?;
        if group.is_empty() {
            debug!("No {} buttons", kind);
            return Ok(None);
        }

        let config = group.to_config()?;
        match service.create(&config) {
            Ok(handle) => Ok(Some(handle)),
            Err(e) => {
                debug!("Error registering {} buttons: {}", kind, e);
                Err(e.into())
            }
        }
    }
}
