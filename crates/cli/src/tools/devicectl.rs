use std::io;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use xcrunner_core::error::{Error, Result};
use xcrunner_core::interfaces::{DeviceRecord, DeviceSource};

const XCRUN: &str = "xcrun";
const INSTALL_HINT: &str = "install Xcode and run `xcode-select --install`";

/// devicectl-backed physical-device enumeration and lifecycle.
///
/// devicectl only emits JSON to a file, hence the tempfile round trip on
/// every listing.
pub struct Devicectl;

impl Devicectl {
    fn invoke(&self, args: &[String]) -> Result<()> {
        let output = Command::new(XCRUN)
            .arg("devicectl")
            .args(args)
            .output()
            .map_err(missing_xcrun)?;
        if !output.status.success() {
            return Err(Error::ExecutionFailed {
                tool: "devicectl".to_string(),
                status: output.status,
            });
        }
        Ok(())
    }

    pub fn install(&self, udid: &str, app: &Path) -> Result<()> {
        self.invoke(&[
            "device".to_string(),
            "install".to_string(),
            "app".to_string(),
            "--device".to_string(),
            udid.to_string(),
            app.display().to_string(),
        ])
    }

    pub fn launch(
        &self,
        udid: &str,
        bundle_id: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> Result<()> {
        let mut full = vec![
            "device".to_string(),
            "process".to_string(),
            "launch".to_string(),
            "--device".to_string(),
            udid.to_string(),
        ];
        if !env.is_empty() {
            let map: serde_json::Map<String, serde_json::Value> = env
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            full.push("--environment-variables".to_string());
            full.push(serde_json::Value::Object(map).to_string());
        }
        full.push(bundle_id.to_string());
        full.extend(args.iter().cloned());
        self.invoke(&full)
    }
}

impl DeviceSource for Devicectl {
    fn devices(&self) -> Result<Vec<DeviceRecord>> {
        let out = tempfile::NamedTempFile::new()?;
        let json_path = out.path().display().to_string();
        let listing = Command::new(XCRUN)
            .args(["devicectl", "list", "devices", "--json-output", &json_path])
            .output()
            .map_err(missing_xcrun)?;
        if !listing.status.success() {
            // older toolchains have no devicectl; a run without physical
            // devices is still useful
            warn!(status = %listing.status, "device listing unavailable");
            return Ok(Vec::new());
        }
        let raw = std::fs::read(out.path())?;
        let records = parse_devices(&raw)?;
        debug!(count = records.len(), "listed connected devices");
        Ok(records)
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
struct Document {
    result: ResultBlock,
}

#[derive(Debug, Deserialize)]
struct ResultBlock {
    #[serde(default)]
    devices: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    identifier: String,
    #[serde(default)]
    device_properties: Properties,
    #[serde(default)]
    hardware_properties: Hardware,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hardware {
    udid: Option<String>,
    device_type: Option<String>,
}

fn parse_devices(raw: &[u8]) -> Result<Vec<DeviceRecord>> {
    let doc: Document = serde_json::from_slice(raw)?;
    Ok(doc
        .result
        .devices
        .into_iter()
        .map(|entry| DeviceRecord {
            // hardware udid is what xcodebuild's `id=` specifier wants
            udid: entry.hardware_properties.udid.unwrap_or(entry.identifier),
            name: entry.device_properties.name,
            hardware_family: entry.hardware_properties.device_type.unwrap_or_default(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_maps_hardware_fields() {
        let raw = br#"{
            "result": {
                "devices": [
                    {
                        "identifier": "CTL-UUID-1",
                        "deviceProperties": {"name": "Road iPhone"},
                        "hardwareProperties": {"udid": "HW-UDID-1", "deviceType": "iPhone"}
                    }
                ]
            }
        }"#;

        let records = parse_devices(raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].udid, "HW-UDID-1");
        assert_eq!(records[0].name, "Road iPhone");
        assert_eq!(records[0].hardware_family, "iPhone");
    }

    #[test]
    fn missing_hardware_udid_falls_back_to_the_identifier() {
        let raw = br#"{
            "result": {
                "devices": [
                    {"identifier": "CTL-UUID-2", "deviceProperties": {"name": "Lab Watch"}}
                ]
            }
        }"#;

        let records = parse_devices(raw).unwrap();
        assert_eq!(records[0].udid, "CTL-UUID-2");
        assert!(records[0].hardware_family.is_empty());
    }

    #[test]
    fn empty_result_is_fine() {
        let records = parse_devices(br#"{"result": {"devices": []}}"#).unwrap();
        assert!(records.is_empty());
    }
}
