//! Device identification through the vendor `_DSM`

use surfacebook2_acpi::{AcpiDevice, DsmQuery, Uuid};
use tracing::debug;

use crate::error::{IdentifyError, Mismatch};

/// `_HID` the driver binds to
pub const ACPI_HID: &str = "MSHW0040";

/// Expected prefix of the node's bus id
pub const BUS_ID_PREFIX: &str = "VGBI";

/// Vendor `_DSM` capability group
pub const DSM_GUID: Uuid = Uuid::from_fields(
    0x6fd05c69,
    0xcde3,
    0x49f4,
    &[0x95, 0xed, 0xab, 0x16, 0x65, 0x49, 0x80, 0x35],
);

pub const DSM_REVISION: u64 = 0x01;

/// `_DSM` function returning the device id
pub const DSM_FN_DEVICE_ID: u64 = 0x02;

/// Device id reported by the Surface Book 2 button array
pub const EXPECTED_DEVICE_ID: u64 = 0x05;

/// Identity value returned by firmware
pub type DeviceIdentity = u64;

/// Queries and validates the identity of a node
#[derive(Debug, Clone)]
pub struct DeviceIdentifier<Q> {
    query: Q,
}

impl<Q: DsmQuery> DeviceIdentifier<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Read the device id through `_DSM`
    ///
    /// Safe to call repeatedly; the only side effect is the firmware call.
    pub fn identify(&self, node: &AcpiDevice) -> Result<DeviceIdentity, IdentifyError> {
        let obj = match self
            .query
            .evaluate_dsm(node, &DSM_GUID, DSM_REVISION, DSM_FN_DEVICE_ID)
        {
            Ok(Some(obj)) => obj,
            Ok(None) => {
                debug!("{}: _DSM returned no object", node.instance());
                return Err(IdentifyError::QueryUnavailable("no result".into()));
            }
            Err(e) => {
                debug!("{}: failed to evaluate _DSM: {}", node.instance(), e);
                return Err(IdentifyError::QueryUnavailable(e.to_string()));
            }
        };

        match obj.as_integer() {
            Some(id) => Ok(id),
            None => {
                debug!(
                    "{}: received unexpected {} from _DSM",
                    node.instance(),
                    obj.type_name()
                );
                Err(IdentifyError::UnexpectedResultType(obj.type_name()))
            }
        }
    }

    /// Gate a node: bus id prefix first, then the firmware identity
    ///
    /// The query is not issued when the bus id already rules the node out.
    pub fn check(&self, node: &AcpiDevice) -> Result<DeviceIdentity, Mismatch> {
        if !node.bus_id().starts_with(BUS_ID_PREFIX) {
            return Err(Mismatch::BusId {
                found: node.bus_id().to_string(),
                expected: BUS_ID_PREFIX,
            });
        }

        let id = self.identify(node)?;
        if id != EXPECTED_DEVICE_ID {
            return Err(Mismatch::DeviceId {
                found: id,
                expected: EXPECTED_DEVICE_ID,
            });
        }

        Ok(id)
    }
}
