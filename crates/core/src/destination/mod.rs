//! Execution targets: the local machine, simulators, and physical devices.
//!
//! A [`Destination`] is rebuilt fresh on every enumeration pass and never
//! mutated afterwards; its platform tag is derived from the variant, so it
//! cannot drift from the hardware it describes.

pub mod catalog;
pub mod filter;

pub use catalog::DestinationCatalog;
pub use filter::{Partition, partition};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// OS family of a simulator or a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    Ios,
    Watchos,
    Tvos,
    Visionos,
}

impl OsFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            OsFamily::Ios => "iOS",
            OsFamily::Watchos => "watchOS",
            OsFamily::Tvos => "tvOS",
            OsFamily::Visionos => "visionOS",
        }
    }
}

/// Boot state reported by CoreSimulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimState {
    Booted,
    Shutdown,
}

impl SimState {
    /// CoreSimulator reports a handful of transitional states ("Booting",
    /// "Shutting Down"); everything that is not fully booted counts as
    /// shutdown here.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("booted") {
            SimState::Booted
        } else {
            SimState::Shutdown
        }
    }
}

/// Hardware family of a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceFamily {
    Iphone,
    Ipad,
    AppleWatch,
    AppleTv,
    AppleVision,
}

impl DeviceFamily {
    /// Classify the raw hardware-family string reported by the device
    /// lister. An unrecognized family is a hard error: dropping a device
    /// silently would make it look unplugged.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "iphone" => Ok(DeviceFamily::Iphone),
            "ipad" => Ok(DeviceFamily::Ipad),
            "applewatch" => Ok(DeviceFamily::AppleWatch),
            "appletv" => Ok(DeviceFamily::AppleTv),
            "applevision" | "applevisionpro" | "visionpro" => Ok(DeviceFamily::AppleVision),
            _ => Err(Error::UnknownDeviceFamily(raw.to_string())),
        }
    }

    pub fn os(&self) -> OsFamily {
        match self {
            DeviceFamily::Iphone | DeviceFamily::Ipad => OsFamily::Ios,
            DeviceFamily::AppleWatch => OsFamily::Watchos,
            DeviceFamily::AppleTv => OsFamily::Tvos,
            DeviceFamily::AppleVision => OsFamily::Visionos,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeviceFamily::Iphone => "iPhone",
            DeviceFamily::Ipad => "iPad",
            DeviceFamily::AppleWatch => "Apple Watch",
            DeviceFamily::AppleTv => "Apple TV",
            DeviceFamily::AppleVision => "Apple Vision",
        }
    }
}

/// A platform tag as it appears in the SUPPORTED_PLATFORMS build setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Ios,
    IosSimulator,
    Watchos,
    WatchosSimulator,
    Tvos,
    TvosSimulator,
    Visionos,
    VisionosSimulator,
}

impl Platform {
    /// Parse a single SUPPORTED_PLATFORMS token. Unknown tokens yield
    /// `None`; callers skip them rather than fail, since the toolchain
    /// grows platforms faster than this list does.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "macosx" => Some(Platform::MacOs),
            "iphoneos" => Some(Platform::Ios),
            "iphonesimulator" => Some(Platform::IosSimulator),
            "watchos" => Some(Platform::Watchos),
            "watchsimulator" => Some(Platform::WatchosSimulator),
            "appletvos" => Some(Platform::Tvos),
            "appletvsimulator" => Some(Platform::TvosSimulator),
            "xros" => Some(Platform::Visionos),
            "xrsimulator" => Some(Platform::VisionosSimulator),
            _ => None,
        }
    }

    /// The token xcodebuild uses for this platform.
    pub fn token(&self) -> &'static str {
        match self {
            Platform::MacOs => "macosx",
            Platform::Ios => "iphoneos",
            Platform::IosSimulator => "iphonesimulator",
            Platform::Watchos => "watchos",
            Platform::WatchosSimulator => "watchsimulator",
            Platform::Tvos => "appletvos",
            Platform::TvosSimulator => "appletvsimulator",
            Platform::Visionos => "xros",
            Platform::VisionosSimulator => "xrsimulator",
        }
    }

    /// The human-facing name used in destination specifiers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Ios => "iOS",
            Platform::IosSimulator => "iOS Simulator",
            Platform::Watchos => "watchOS",
            Platform::WatchosSimulator => "watchOS Simulator",
            Platform::Tvos => "tvOS",
            Platform::TvosSimulator => "tvOS Simulator",
            Platform::Visionos => "visionOS",
            Platform::VisionosSimulator => "visionOS Simulator",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The local machine as an execution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacTarget {
    /// Process architecture probed from the host at enumeration time.
    pub arch: String,
}

/// A CoreSimulator device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorTarget {
    pub os: OsFamily,
    pub name: String,
    pub udid: String,
    pub state: SimState,
}

/// Physical hardware reachable from this host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    pub family: DeviceFamily,
    pub name: String,
    pub udid: String,
}

/// A single execution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    Mac(MacTarget),
    Simulator(SimulatorTarget),
    Device(DeviceTarget),
}

impl Destination {
    /// Stable identifier, unique within one enumeration snapshot. This is
    /// what selection memory records.
    pub fn id(&self) -> String {
        match self {
            Destination::Mac(mac) => format!("mac-{}", mac.arch),
            Destination::Simulator(sim) => sim.udid.clone(),
            Destination::Device(dev) => dev.udid.clone(),
        }
    }

    /// Platform tag used by the compatibility filter. Derived from the
    /// variant, so it is immutable for the lifetime of the destination.
    pub fn platform(&self) -> Platform {
        match self {
            Destination::Mac(_) => Platform::MacOs,
            Destination::Simulator(sim) => match sim.os {
                OsFamily::Ios => Platform::IosSimulator,
                OsFamily::Watchos => Platform::WatchosSimulator,
                OsFamily::Tvos => Platform::TvosSimulator,
                OsFamily::Visionos => Platform::VisionosSimulator,
            },
            Destination::Device(dev) => match dev.family.os() {
                OsFamily::Ios => Platform::Ios,
                OsFamily::Watchos => Platform::Watchos,
                OsFamily::Tvos => Platform::Tvos,
                OsFamily::Visionos => Platform::Visionos,
            },
        }
    }

    /// Human-readable row for the interactive picker.
    pub fn label(&self) -> String {
        match self {
            Destination::Mac(mac) => format!("My Mac ({})", mac.arch),
            Destination::Simulator(sim) => {
                if sim.state == SimState::Booted {
                    format!("{} ({} Simulator, booted)", sim.name, sim.os.display_name())
                } else {
                    format!("{} ({} Simulator)", sim.name, sim.os.display_name())
                }
            }
            Destination::Device(dev) => {
                format!("{} ({})", dev.name, dev.family.display_name())
            }
        }
    }

    /// The value handed to xcodebuild's `-destination` parameter.
    pub fn specifier(&self) -> String {
        match self {
            Destination::Mac(mac) => format!("platform=macOS,arch={}", mac.arch),
            Destination::Simulator(sim) => format!("id={}", sim.udid),
            Destination::Device(dev) => format!("id={}", dev.udid),
        }
    }

    /// The display name of the device or simulator, if it has one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Destination::Mac(_) => None,
            Destination::Simulator(sim) => Some(&sim.name),
            Destination::Device(dev) => Some(&dev.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted_sim() -> Destination {
        Destination::Simulator(SimulatorTarget {
            os: OsFamily::Ios,
            name: "iPhone 15 Pro".to_string(),
            udid: "SIM-1234".to_string(),
            state: SimState::Booted,
        })
    }

    #[test]
    fn platform_tags_follow_the_variant() {
        let mac = Destination::Mac(MacTarget {
            arch: "arm64".to_string(),
        });
        assert_eq!(mac.platform(), Platform::MacOs);
        assert_eq!(booted_sim().platform(), Platform::IosSimulator);

        let watch = Destination::Device(DeviceTarget {
            family: DeviceFamily::AppleWatch,
            name: "Watch".to_string(),
            udid: "W-1".to_string(),
        });
        assert_eq!(watch.platform(), Platform::Watchos);
    }

    #[test]
    fn device_family_classification() {
        assert_eq!(DeviceFamily::parse("iPhone").unwrap(), DeviceFamily::Iphone);
        assert_eq!(
            DeviceFamily::parse("Apple Watch").unwrap(),
            DeviceFamily::AppleWatch
        );
        assert_eq!(
            DeviceFamily::parse("appleVision").unwrap(),
            DeviceFamily::AppleVision
        );
        assert_eq!(
            DeviceFamily::parse("Apple Vision Pro").unwrap(),
            DeviceFamily::AppleVision
        );
        assert!(matches!(
            DeviceFamily::parse("Newton"),
            Err(Error::UnknownDeviceFamily(_))
        ));
    }

    #[test]
    fn specifiers_use_ids_except_for_the_mac() {
        let mac = Destination::Mac(MacTarget {
            arch: "arm64".to_string(),
        });
        assert_eq!(mac.specifier(), "platform=macOS,arch=arm64");
        assert_eq!(booted_sim().specifier(), "id=SIM-1234");
    }

    #[test]
    fn labels_mention_boot_state() {
        assert_eq!(booted_sim().label(), "iPhone 15 Pro (iOS Simulator, booted)");

        let shut = Destination::Simulator(SimulatorTarget {
            os: OsFamily::Tvos,
            name: "Apple TV 4K".to_string(),
            udid: "TV-1".to_string(),
            state: SimState::Shutdown,
        });
        assert_eq!(shut.label(), "Apple TV 4K (tvOS Simulator)");
    }

    #[test]
    fn platform_tokens_round_trip() {
        for platform in [
            Platform::MacOs,
            Platform::Ios,
            Platform::IosSimulator,
            Platform::Watchos,
            Platform::WatchosSimulator,
            Platform::Tvos,
            Platform::TvosSimulator,
            Platform::Visionos,
            Platform::VisionosSimulator,
        ] {
            assert_eq!(Platform::parse(platform.token()), Some(platform));
        }
        assert_eq!(Platform::parse("playstation"), None);
    }
}
