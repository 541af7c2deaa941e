// ── IPAM domain types ──

use serde::{Deserialize, Serialize};

use super::dcim::Interface;
use super::extras::Tag;

/// What an IP address is assigned to. Exactly one alternative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignedObject {
    Interface(Interface),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddress {
    /// Address with optional prefix length, e.g. `192.0.2.1/24`.
    pub address: String,
    pub assigned_object: Option<AssignedObject>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}
