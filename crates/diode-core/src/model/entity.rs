// ── Entity envelope ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dcim::{Device, DeviceType, Interface, Manufacturer, Platform, Role, Site};

/// One discovered fact: exactly one kind of record plus when it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Discovery time at the source. Must not lie in the future.
    pub timestamp: DateTime<Utc>,
    pub data: EntityData,
}

impl Entity {
    /// Wrap `data`, stamped with the current time.
    pub fn new(data: impl Into<EntityData>) -> Self {
        Self::discovered_at(data, Utc::now())
    }

    pub fn discovered_at(data: impl Into<EntityData>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            data: data.into(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.data.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityData {
    Site(Site),
    Platform(Platform),
    Manufacturer(Manufacturer),
    Device(Device),
    DeviceRole(Role),
    DeviceType(DeviceType),
    Interface(Interface),
}

/// Payload-free discriminant of [`EntityData`]. Displays as the wire field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Site,
    Platform,
    Manufacturer,
    Device,
    DeviceRole,
    DeviceType,
    Interface,
}

impl EntityData {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Site(_) => EntityKind::Site,
            Self::Platform(_) => EntityKind::Platform,
            Self::Manufacturer(_) => EntityKind::Manufacturer,
            Self::Device(_) => EntityKind::Device,
            Self::DeviceRole(_) => EntityKind::DeviceRole,
            Self::DeviceType(_) => EntityKind::DeviceType,
            Self::Interface(_) => EntityKind::Interface,
        }
    }
}

macro_rules! entity_data_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for EntityData {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

entity_data_from! {
    Site => Site,
    Platform => Platform,
    Manufacturer => Manufacturer,
    Device => Device,
    Role => DeviceRole,
    DeviceType => DeviceType,
    Interface => Interface,
}
