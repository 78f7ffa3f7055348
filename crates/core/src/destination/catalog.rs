//! Destination enumeration: the local machine first, then simulators, then
//! physical devices.

use tracing::{debug, warn};

use super::{
    Destination, DeviceFamily, DeviceTarget, MacTarget, OsFamily, SimState, SimulatorTarget,
};
use crate::error::Result;
use crate::interfaces::{DeviceRecord, DeviceSource, SimulatorRecord, SimulatorSource};

/// Merges the execution targets visible from this host. Holds no state of
/// its own: every [`enumerate`](DestinationCatalog::enumerate) call
/// re-queries both sources and re-probes the host architecture.
pub struct DestinationCatalog<'a> {
    simulators: &'a dyn SimulatorSource,
    devices: &'a dyn DeviceSource,
}

impl<'a> DestinationCatalog<'a> {
    pub fn new(simulators: &'a dyn SimulatorSource, devices: &'a dyn DeviceSource) -> Self {
        Self {
            simulators,
            devices,
        }
    }

    /// Every destination available right now, in stable order: local
    /// machine, simulators, devices.
    pub fn enumerate(&self) -> Result<Vec<Destination>> {
        let mut found = vec![Destination::Mac(MacTarget {
            arch: host_arch().to_string(),
        })];

        for record in self.simulators.simulators()? {
            match classify_simulator(&record) {
                Some(sim) => found.push(Destination::Simulator(sim)),
                None => warn!(
                    runtime = %record.runtime,
                    name = %record.name,
                    "skipping simulator with unrecognized runtime"
                ),
            }
        }

        for record in self.devices.devices()? {
            found.push(Destination::Device(classify_device(&record)?));
        }

        debug!(count = found.len(), "enumerated destinations");
        Ok(found)
    }
}

/// Host architecture in the spelling xcodebuild expects.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "arm64",
        other => other,
    }
}

fn classify_simulator(record: &SimulatorRecord) -> Option<SimulatorTarget> {
    let os = runtime_os_family(&record.runtime)?;
    Some(SimulatorTarget {
        os,
        name: record.name.clone(),
        udid: record.udid.clone(),
        state: SimState::parse(&record.state),
    })
}

fn classify_device(record: &DeviceRecord) -> Result<DeviceTarget> {
    let family = DeviceFamily::parse(&record.hardware_family)?;
    Ok(DeviceTarget {
        family,
        name: record.name.clone(),
        udid: record.udid.clone(),
    })
}

/// OS family encoded in a CoreSimulator runtime identifier such as
/// `com.apple.CoreSimulator.SimRuntime.iOS-17-5`.
fn runtime_os_family(runtime: &str) -> Option<OsFamily> {
    let tail = runtime.rsplit('.').next()?;
    let os = tail.split('-').next()?;
    match os.to_ascii_lowercase().as_str() {
        "ios" => Some(OsFamily::Ios),
        "watchos" => Some(OsFamily::Watchos),
        "tvos" => Some(OsFamily::Tvos),
        "xros" | "visionos" => Some(OsFamily::Visionos),
        _ => None,
    }
}
