// ── Typed references ──
//
// A reference is a type URL plus an opaque protobuf payload. The payload's
// schema is resolved at decode time through a `TypeRegistry`, so a field
// like `Device.role` can carry whichever record kind the producer chose.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::dcim::{DeviceType, Interface, Manufacturer, Platform, Role, Site};
use super::extras::Tag;
use super::ipam::IpAddress;
use crate::convert;

/// Prefix used when packing references.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com/";

/// Type identifier plus encoded payload. Lossless on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyRef {
    pub type_url: String,
    pub value: Vec<u8>,
}

/// Record kinds a reference may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Site,
    Platform,
    Manufacturer,
    Role,
    DeviceType,
    Interface,
    IpAddress,
    Tag,
}

impl ResourceKind {
    /// Fully-qualified protobuf message name.
    pub fn full_name(self) -> &'static str {
        match self {
            Self::Site => "diode.v1.Site",
            Self::Platform => "diode.v1.Platform",
            Self::Manufacturer => "diode.v1.Manufacturer",
            Self::Role => "diode.v1.Role",
            Self::DeviceType => "diode.v1.DeviceType",
            Self::Interface => "diode.v1.Interface",
            Self::IpAddress => "diode.v1.IPAddress",
            Self::Tag => "diode.v1.Tag",
        }
    }

    pub fn type_url(self) -> String {
        format!("{TYPE_URL_PREFIX}{}", self.full_name())
    }
}

/// A decoded reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Site(Site),
    Platform(Platform),
    Manufacturer(Manufacturer),
    Role(Role),
    DeviceType(DeviceType),
    Interface(Interface),
    IpAddress(IpAddress),
    Tag(Tag),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Site(_) => ResourceKind::Site,
            Self::Platform(_) => ResourceKind::Platform,
            Self::Manufacturer(_) => ResourceKind::Manufacturer,
            Self::Role(_) => ResourceKind::Role,
            Self::DeviceType(_) => ResourceKind::DeviceType,
            Self::Interface(_) => ResourceKind::Interface,
            Self::IpAddress(_) => ResourceKind::IpAddress,
            Self::Tag(_) => ResourceKind::Tag,
        }
    }
}

macro_rules! resource_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for Resource {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

resource_from!(Site, Platform, Manufacturer, Role, DeviceType, Interface, IpAddress, Tag);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefError {
    #[error("unknown type URL '{0}'")]
    UnknownType(String),

    #[error("cannot decode {kind} payload: {reason}")]
    Decode { kind: ResourceKind, reason: String },

    #[error("expected a {expected} reference, found {found}")]
    Mismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },
}

// ── Registry ────────────────────────────────────────────────────────

/// Maps message names to the kinds this crate can decode.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_name: HashMap<&'static str, ResourceKind>,
}

static STANDARD: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::with_known_kinds);

impl TypeRegistry {
    /// A registry that recognises every [`ResourceKind`].
    pub fn with_known_kinds() -> Self {
        let mut registry = Self::default();
        for kind in ResourceKind::iter() {
            registry.register(kind);
        }
        registry
    }

    /// The shared registry used by [`AnyRef::decode`].
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    pub fn register(&mut self, kind: ResourceKind) {
        self.by_name.insert(kind.full_name(), kind);
    }

    /// Resolve a type URL. Only the part after the last `/` is significant.
    pub fn resolve(&self, type_url: &str) -> Result<ResourceKind, RefError> {
        let name = type_url.rsplit('/').next().unwrap_or(type_url);
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| RefError::UnknownType(type_url.to_owned()))
    }

    pub fn decode(&self, reference: &AnyRef) -> Result<Resource, RefError> {
        let kind = self.resolve(&reference.type_url)?;
        convert::decode_resource(kind, &reference.value).map_err(|e| RefError::Decode {
            kind,
            reason: e.to_string(),
        })
    }
}

impl AnyRef {
    /// Encode `resource` under its canonical type URL.
    pub fn pack(resource: impl Into<Resource>) -> Self {
        let resource = resource.into();
        Self {
            type_url: resource.kind().type_url(),
            value: convert::encode_resource(&resource),
        }
    }

    /// Decode against the standard registry.
    pub fn decode(&self) -> Result<Resource, RefError> {
        TypeRegistry::standard().decode(self)
    }

    /// Decode and require a specific kind.
    pub fn decode_as(&self, expected: ResourceKind) -> Result<Resource, RefError> {
        let resource = self.decode()?;
        let found = resource.kind();
        if found == expected {
            Ok(resource)
        } else {
            Err(RefError::Mismatch { expected, found })
        }
    }
}
