// ── Domain / wire conversions ──
//
// Bridges `diode_api::proto::v1` messages and the `crate::model` types.
// Records convert infallibly in both directions. An `Entity` coming off the
// wire may lack its kind or timestamp, so that direction is `TryFrom`.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use prost::Message;
use thiserror::Error;

use diode_api::proto::v1 as pb;

use crate::model::{
    AnyRef, AssignedObject, Device, DeviceType, Entity, EntityData, IngestRequest,
    IngestResponse, Interface, IpAddress, Manufacturer, Platform, Resource, ResourceKind, Role,
    Site, Tag,
};

/// Why a wire entity has no domain counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("exactly one entity kind must be set")]
    MissingData,

    #[error("timestamp is required")]
    MissingTimestamp,

    #[error("timestamp is out of range")]
    InvalidTimestamp,
}

// ── Helpers ────────────────────────────────────────────────────────

fn tags_to_wire(tags: Vec<Tag>) -> Vec<pb::Tag> {
    tags.into_iter().map(Into::into).collect()
}

fn tags_from_wire(tags: Vec<pb::Tag>) -> Vec<Tag> {
    tags.into_iter().map(Into::into).collect()
}

pub(crate) fn timestamp_to_wire(ts: DateTime<Utc>) -> prost_types::Timestamp {
    SystemTime::from(ts).into()
}

pub(crate) fn timestamp_from_wire(
    ts: prost_types::Timestamp,
) -> Result<DateTime<Utc>, ConvertError> {
    SystemTime::try_from(ts)
        .map(DateTime::<Utc>::from)
        .map_err(|_| ConvertError::InvalidTimestamp)
}

pub(crate) fn encode_resource(resource: &Resource) -> Vec<u8> {
    match resource.clone() {
        Resource::Site(r) => pb::Site::from(r).encode_to_vec(),
        Resource::Platform(r) => pb::Platform::from(r).encode_to_vec(),
        Resource::Manufacturer(r) => pb::Manufacturer::from(r).encode_to_vec(),
        Resource::Role(r) => pb::Role::from(r).encode_to_vec(),
        Resource::DeviceType(r) => pb::DeviceType::from(r).encode_to_vec(),
        Resource::Interface(r) => pb::Interface::from(r).encode_to_vec(),
        Resource::IpAddress(r) => pb::IpAddress::from(r).encode_to_vec(),
        Resource::Tag(r) => pb::Tag::from(r).encode_to_vec(),
    }
}

pub(crate) fn decode_resource(
    kind: ResourceKind,
    bytes: &[u8],
) -> Result<Resource, prost::DecodeError> {
    Ok(match kind {
        ResourceKind::Site => Resource::Site(pb::Site::decode(bytes)?.into()),
        ResourceKind::Platform => Resource::Platform(pb::Platform::decode(bytes)?.into()),
        ResourceKind::Manufacturer => {
            Resource::Manufacturer(pb::Manufacturer::decode(bytes)?.into())
        }
        ResourceKind::Role => Resource::Role(pb::Role::decode(bytes)?.into()),
        ResourceKind::DeviceType => Resource::DeviceType(pb::DeviceType::decode(bytes)?.into()),
        ResourceKind::Interface => Resource::Interface(pb::Interface::decode(bytes)?.into()),
        ResourceKind::IpAddress => Resource::IpAddress(pb::IpAddress::decode(bytes)?.into()),
        ResourceKind::Tag => Resource::Tag(pb::Tag::decode(bytes)?.into()),
    })
}

// ── Records ────────────────────────────────────────────────────────

impl From<Tag> for pb::Tag {
    fn from(t: Tag) -> Self {
        Self {
            name: t.name,
            slug: t.slug,
            color: t.color,
        }
    }
}

impl From<pb::Tag> for Tag {
    fn from(t: pb::Tag) -> Self {
        Self {
            name: t.name,
            slug: t.slug,
            color: t.color,
        }
    }
}

impl From<AnyRef> for prost_types::Any {
    fn from(r: AnyRef) -> Self {
        Self {
            type_url: r.type_url,
            value: r.value,
        }
    }
}

impl From<prost_types::Any> for AnyRef {
    fn from(a: prost_types::Any) -> Self {
        Self {
            type_url: a.type_url,
            value: a.value,
        }
    }
}

impl From<Manufacturer> for pb::Manufacturer {
    fn from(m: Manufacturer) -> Self {
        Self {
            name: m.name,
            slug: m.slug,
            description: m.description,
            tags: tags_to_wire(m.tags),
        }
    }
}

impl From<pb::Manufacturer> for Manufacturer {
    fn from(m: pb::Manufacturer) -> Self {
        Self {
            name: m.name,
            slug: m.slug,
            description: m.description,
            tags: tags_from_wire(m.tags),
        }
    }
}

impl From<Platform> for pb::Platform {
    fn from(p: Platform) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            manufacturer: p.manufacturer.map(Into::into),
            description: p.description,
            tags: tags_to_wire(p.tags),
        }
    }
}

impl From<pb::Platform> for Platform {
    fn from(p: pb::Platform) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            manufacturer: p.manufacturer.map(Into::into),
            description: p.description,
            tags: tags_from_wire(p.tags),
        }
    }
}

impl From<Role> for pb::Role {
    fn from(r: Role) -> Self {
        Self {
            name: r.name,
            slug: r.slug,
            color: r.color,
            description: r.description,
            tags: tags_to_wire(r.tags),
        }
    }
}

impl From<pb::Role> for Role {
    fn from(r: pb::Role) -> Self {
        Self {
            name: r.name,
            slug: r.slug,
            color: r.color,
            description: r.description,
            tags: tags_from_wire(r.tags),
        }
    }
}

impl From<DeviceType> for pb::DeviceType {
    fn from(d: DeviceType) -> Self {
        Self {
            model: d.model,
            slug: d.slug,
            manufacturer: d.manufacturer.map(Into::into),
            description: d.description,
            comments: d.comments,
            part_number: d.part_number,
            tags: tags_to_wire(d.tags),
        }
    }
}

impl From<pb::DeviceType> for DeviceType {
    fn from(d: pb::DeviceType) -> Self {
        Self {
            model: d.model,
            slug: d.slug,
            manufacturer: d.manufacturer.map(Into::into),
            description: d.description,
            comments: d.comments,
            part_number: d.part_number,
            tags: tags_from_wire(d.tags),
        }
    }
}

impl From<Site> for pb::Site {
    fn from(s: Site) -> Self {
        Self {
            name: s.name,
            slug: s.slug,
            status: s.status,
            facility: s.facility,
            description: s.description,
            comments: s.comments,
            tags: tags_to_wire(s.tags),
        }
    }
}

impl From<pb::Site> for Site {
    fn from(s: pb::Site) -> Self {
        Self {
            name: s.name,
            slug: s.slug,
            status: s.status,
            facility: s.facility,
            description: s.description,
            comments: s.comments,
            tags: tags_from_wire(s.tags),
        }
    }
}

impl From<Device> for pb::Device {
    fn from(d: Device) -> Self {
        Self {
            name: d.name,
            device_fqdn: d.device_fqdn,
            device_type: d.device_type.map(Into::into),
            role: d.role.map(Into::into),
            platform: d.platform.map(Into::into),
            serial: d.serial,
            site: d.site.map(Into::into),
            vc_position: d.vc_position,
            status: d.status,
            description: d.description,
            tags: tags_to_wire(d.tags),
        }
    }
}

impl From<pb::Device> for Device {
    fn from(d: pb::Device) -> Self {
        Self {
            name: d.name,
            device_fqdn: d.device_fqdn,
            device_type: d.device_type.map(Into::into),
            role: d.role.map(Into::into),
            platform: d.platform.map(Into::into),
            serial: d.serial,
            site: d.site.map(Into::into),
            vc_position: d.vc_position,
            status: d.status,
            description: d.description,
            tags: tags_from_wire(d.tags),
        }
    }
}

impl From<Interface> for pb::Interface {
    fn from(i: Interface) -> Self {
        Self {
            name: i.name,
            device: i.device.map(Into::into),
            r#type: i.kind,
            enabled: i.enabled,
            mtu: i.mtu,
            mac_address: i.mac_address,
            speed: i.speed,
            wwn: i.wwn,
            mgmt_only: i.mgmt_only,
            description: i.description,
            mark_connected: i.mark_connected,
            mode: i.mode,
            tags: tags_to_wire(i.tags),
        }
    }
}

impl From<pb::Interface> for Interface {
    fn from(i: pb::Interface) -> Self {
        Self {
            name: i.name,
            device: i.device.map(Into::into),
            kind: i.r#type,
            enabled: i.enabled,
            mtu: i.mtu,
            mac_address: i.mac_address,
            speed: i.speed,
            wwn: i.wwn,
            mgmt_only: i.mgmt_only,
            description: i.description,
            mark_connected: i.mark_connected,
            mode: i.mode,
            tags: tags_from_wire(i.tags),
        }
    }
}

impl From<IpAddress> for pb::IpAddress {
    fn from(ip: IpAddress) -> Self {
        Self {
            address: ip.address,
            assigned_object: ip.assigned_object.map(|o| match o {
                AssignedObject::Interface(i) => {
                    pb::ip_address::AssignedObject::Interface(i.into())
                }
            }),
            status: ip.status,
            role: ip.role,
            dns_name: ip.dns_name,
            description: ip.description,
            comments: ip.comments,
            tags: tags_to_wire(ip.tags),
        }
    }
}

impl From<pb::IpAddress> for IpAddress {
    fn from(ip: pb::IpAddress) -> Self {
        Self {
            address: ip.address,
            assigned_object: ip.assigned_object.map(|o| match o {
                pb::ip_address::AssignedObject::Interface(i) => {
                    AssignedObject::Interface(i.into())
                }
            }),
            status: ip.status,
            role: ip.role,
            dns_name: ip.dns_name,
            description: ip.description,
            comments: ip.comments,
            tags: tags_from_wire(ip.tags),
        }
    }
}

// ── Envelope ───────────────────────────────────────────────────────

impl From<EntityData> for pb::entity::Data {
    fn from(data: EntityData) -> Self {
        match data {
            EntityData::Site(s) => Self::Site(s.into()),
            EntityData::Platform(p) => Self::Platform(p.into()),
            EntityData::Manufacturer(m) => Self::Manufacturer(m.into()),
            EntityData::Device(d) => Self::Device(d.into()),
            EntityData::DeviceRole(r) => Self::DeviceRole(r.into()),
            EntityData::DeviceType(d) => Self::DeviceType(d.into()),
            EntityData::Interface(i) => Self::Interface(i.into()),
        }
    }
}

impl From<pb::entity::Data> for EntityData {
    fn from(data: pb::entity::Data) -> Self {
        match data {
            pb::entity::Data::Site(s) => Self::Site(s.into()),
            pb::entity::Data::Platform(p) => Self::Platform(p.into()),
            pb::entity::Data::Manufacturer(m) => Self::Manufacturer(m.into()),
            pb::entity::Data::Device(d) => Self::Device(d.into()),
            pb::entity::Data::DeviceRole(r) => Self::DeviceRole(r.into()),
            pb::entity::Data::DeviceType(d) => Self::DeviceType(d.into()),
            pb::entity::Data::Interface(i) => Self::Interface(i.into()),
        }
    }
}

impl From<Entity> for pb::Entity {
    fn from(e: Entity) -> Self {
        Self {
            data: Some(e.data.into()),
            timestamp: Some(timestamp_to_wire(e.timestamp)),
        }
    }
}

impl TryFrom<pb::Entity> for Entity {
    type Error = ConvertError;

    fn try_from(e: pb::Entity) -> Result<Self, Self::Error> {
        let data = e.data.ok_or(ConvertError::MissingData)?;
        let timestamp = e.timestamp.ok_or(ConvertError::MissingTimestamp)?;
        Ok(Self {
            timestamp: timestamp_from_wire(timestamp)?,
            data: data.into(),
        })
    }
}

impl From<IngestRequest> for pb::IngestRequest {
    fn from(r: IngestRequest) -> Self {
        Self {
            stream: r.stream,
            entities: r.entities.into_iter().map(Into::into).collect(),
            id: r.id,
            producer_app_name: r.producer_app_name,
            producer_app_version: r.producer_app_version,
            sdk_name: r.sdk_name,
            sdk_version: r.sdk_version,
        }
    }
}

impl From<IngestResponse> for pb::IngestResponse {
    fn from(r: IngestResponse) -> Self {
        Self { errors: r.errors }
    }
}

impl From<pb::IngestResponse> for IngestResponse {
    fn from(r: pb::IngestResponse) -> Self {
        Self { errors: r.errors }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn entity_without_kind_is_rejected() {
        let wire = pb::Entity {
            data: None,
            timestamp: Some(timestamp_to_wire(Utc::now())),
        };
        assert_eq!(Entity::try_from(wire), Err(ConvertError::MissingData));
    }

    #[test]
    fn entity_without_timestamp_is_rejected() {
        let wire = pb::Entity {
            data: Some(pb::entity::Data::Site(pb::Site::default())),
            timestamp: None,
        };
        assert_eq!(Entity::try_from(wire), Err(ConvertError::MissingTimestamp));
    }

    #[test]
    fn timestamp_keeps_nanoseconds() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let wire = timestamp_to_wire(ts);
        assert_eq!(wire.seconds, 1_700_000_000);
        assert_eq!(wire.nanos, 123_456_789);
        assert_eq!(timestamp_from_wire(wire).unwrap(), ts);
    }

    #[test]
    fn interface_type_maps_to_kind() {
        let wire = pb::Interface {
            name: "eth0".into(),
            r#type: "1000base-t".into(),
            ..pb::Interface::default()
        };
        let domain = Interface::from(wire);
        assert_eq!(domain.kind, "1000base-t");
        assert_eq!(pb::Interface::from(domain).r#type, "1000base-t");
    }
}
