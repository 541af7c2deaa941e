// ── Domain model ──
//
// Closed sum types for everything that can be ingested. The generated wire
// types stay in `diode_api::proto`; `crate::convert` bridges the two.

pub mod any_ref;
pub mod dcim;
pub mod entity;
pub mod extras;
pub mod ipam;
pub mod request;

pub use any_ref::{AnyRef, RefError, Resource, ResourceKind, TYPE_URL_PREFIX, TypeRegistry};
pub use dcim::{Device, DeviceType, Interface, Manufacturer, Platform, Role, Site};
pub use entity::{Entity, EntityData, EntityKind};
pub use extras::Tag;
pub use ipam::{AssignedObject, IpAddress};
pub use request::{IngestRequest, IngestResponse};
