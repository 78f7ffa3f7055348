use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One simulator as the enumeration collaborator reports it, before
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorRecord {
    pub udid: String,
    pub name: String,
    /// Raw boot state string ("Booted", "Shutdown", ...).
    pub state: String,
    /// CoreSimulator runtime identifier, e.g.
    /// `com.apple.CoreSimulator.SimRuntime.iOS-17-5`.
    pub runtime: String,
}

/// One physical device as the device-listing collaborator reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub udid: String,
    pub name: String,
    /// Raw hardware family string ("iPhone", "Apple Watch", ...).
    pub hardware_family: String,
}

/// Live simulator enumeration. Queried fresh on every catalog pass.
pub trait SimulatorSource {
    fn simulators(&self) -> Result<Vec<SimulatorRecord>>;
}

/// Connected-device enumeration. Queried fresh on every catalog pass.
pub trait DeviceSource {
    fn devices(&self) -> Result<Vec<DeviceRecord>>;
}
