use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use xcrunner_core::error::{Error, Result};
use xcrunner_core::interfaces::{SimulatorRecord, SimulatorSource};

const XCRUN: &str = "xcrun";
const INSTALL_HINT: &str = "install Xcode and run `xcode-select --install`";

/// simctl-backed simulator enumeration and lifecycle.
pub struct Simctl;

impl Simctl {
    fn capture(&self, args: &[String]) -> Result<Vec<u8>> {
        let output = Command::new(XCRUN)
            .arg("simctl")
            .args(args)
            .output()
            .map_err(missing_xcrun)?;
        if !output.status.success() {
            return Err(Error::ExecutionFailed {
                tool: "simctl".to_string(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    fn invoke(&self, args: &[String]) -> Result<()> {
        self.capture(args).map(|_| ())
    }

    pub fn boot(&self, udid: &str) -> Result<()> {
        self.invoke(&["boot".to_string(), udid.to_string()])
    }

    /// Bring the Simulator app forward so the booted device is visible.
    /// Cosmetic, so a failure only logs.
    pub fn open_ui(&self) {
        let opened = Command::new("open").args(["-a", "Simulator"]).status();
        match opened {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(%status, "could not open the Simulator app"),
            Err(err) => warn!("could not open the Simulator app: {err}"),
        }
    }

    pub fn install(&self, udid: &str, app: &Path) -> Result<()> {
        self.invoke(&[
            "install".to_string(),
            udid.to_string(),
            app.display().to_string(),
        ])
    }

    /// Stop a running instance before relaunch; absence of one is fine.
    pub fn terminate(&self, udid: &str, bundle_id: &str) {
        let args = [
            "terminate".to_string(),
            udid.to_string(),
            bundle_id.to_string(),
        ];
        if self.invoke(&args).is_err() {
            debug!(bundle_id, "no running instance to terminate");
        }
    }

    /// Launch by bundle id. The launched app's environment rides on
    /// `SIMCTL_CHILD_`-prefixed variables of the simctl process.
    pub fn launch(
        &self,
        udid: &str,
        bundle_id: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<()> {
        let mut process = Command::new(XCRUN);
        process.args(["simctl", "launch", udid, bundle_id]);
        process.args(args);
        for (key, value) in env {
            process.env(format!("SIMCTL_CHILD_{key}"), value);
        }
        let status = process.status().map_err(missing_xcrun)?;
        if !status.success() {
            return Err(Error::ExecutionFailed {
                tool: "simctl".to_string(),
                status,
            });
        }
        Ok(())
    }
}

impl SimulatorSource for Simctl {
    fn simulators(&self) -> Result<Vec<SimulatorRecord>> {
        let raw = self.capture(&[
            "list".to_string(),
            "devices".to_string(),
            "available".to_string(),
            "--json".to_string(),
        ])?;
        parse_simulators(&raw)
    }
}

fn missing_xcrun(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::ToolMissing {
            tool: XCRUN.to_string(),
            hint: INSTALL_HINT.to_string(),
        },
        _ => Error::Io(err),
    }
}

#[derive(Debug, Deserialize)]
struct SimctlList {
    devices: BTreeMap<String, Vec<SimctlDevice>>,
}

#[derive(Debug, Deserialize)]
struct SimctlDevice {
    udid: String,
    name: String,
    state: String,
}

/// Flatten the runtime-keyed device map, keeping the runtime identifier
/// on each record for later OS classification.
fn parse_simulators(raw: &[u8]) -> Result<Vec<SimulatorRecord>> {
    let list: SimctlList = serde_json::from_slice(raw)?;
    let mut records = Vec::new();
    for (runtime, devices) in list.devices {
        for device in devices {
            records.push(SimulatorRecord {
                udid: device.udid,
                name: device.name,
                state: device.state,
                runtime: runtime.clone(),
            });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_map_flattens_with_runtimes_attached() {
        let raw = br#"{
            "devices": {
                "com.apple.CoreSimulator.SimRuntime.iOS-17-5": [
                    {"udid": "A-1", "name": "iPhone 15", "state": "Booted", "isAvailable": true},
                    {"udid": "A-2", "name": "iPad Air", "state": "Shutdown", "isAvailable": true}
                ],
                "com.apple.CoreSimulator.SimRuntime.watchOS-10-0": [
                    {"udid": "B-1", "name": "Watch Series 9", "state": "Shutdown", "isAvailable": true}
                ]
            }
        }"#;

        let records = parse_simulators(raw).unwrap();
        assert_eq!(records.len(), 3);
        let watch = records.iter().find(|r| r.udid == "B-1").unwrap();
        assert!(watch.runtime.contains("watchOS"));
        assert_eq!(watch.name, "Watch Series 9");
    }

    #[test]
    fn empty_device_map_parses_to_nothing() {
        let records = parse_simulators(br#"{"devices": {}}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn garbage_output_is_an_error() {
        assert!(parse_simulators(b"Unable to locate a simulator runtime").is_err());
    }
}
