// ── DCIM domain types ──
//
// Sites, hardware and the interfaces hanging off devices. String fields use
// the empty string for "unset", mirroring the wire format so conversions are
// lossless. Cross references inside `Device` are `AnyRef`s resolved through
// the type registry.

use serde::{Deserialize, Serialize};

use super::any_ref::AnyRef;
use super::extras::Tag;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    pub manufacturer: Option<Manufacturer>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A device role (`DeviceRole` entity kind).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    pub model: String,
    #[serde(default)]
    pub slug: String,
    pub manufacturer: Option<Manufacturer>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// One of `planned`, `staging`, `active`, `decommissioning`, `retired`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub facility: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A network device.
///
/// `device_type`, `role`, `platform` and `site` are typed references: the
/// payload schema is named by the reference itself. Validation requires each
/// to decode to the matching kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub device_fqdn: String,
    pub device_type: Option<AnyRef>,
    pub role: Option<AnyRef>,
    pub platform: Option<AnyRef>,
    #[serde(default)]
    pub serial: String,
    pub site: Option<AnyRef>,
    /// Virtual-chassis position, 0..=255.
    #[serde(default)]
    pub vc_position: i32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Interface {
    pub name: String,
    pub device: Option<Device>,
    /// Interface type slug, e.g. `1000base-t`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mtu: i32,
    #[serde(default)]
    pub mac_address: String,
    /// Speed in Kbps.
    #[serde(default)]
    pub speed: i32,
    #[serde(default)]
    pub wwn: String,
    #[serde(default)]
    pub mgmt_only: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mark_connected: bool,
    /// 802.1Q mode: `access`, `tagged` or `tagged-all`.
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}
