//! Domain model, schema validation and the ingestion SDK for Diode.
//!
//! - **[`model`]**: Closed sum types for the seven entity kinds and their
//!   supporting records. Typed cross references ([`AnyRef`]) are resolved
//!   through a [`TypeRegistry`].
//!
//! - **[`validate`]**: Field-level rules shared by the SDK (before sending)
//!   and the distributor (on receipt).
//!
//! - **[`DiodeClient`]**: Async client that validates and sends batches.
//!   [`blocking::DiodeClient`] wraps it for synchronous callers.

pub mod blocking;
pub mod client;
pub mod convert;
pub mod error;
pub mod model;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::DiodeClient;
pub use convert::ConvertError;
pub use error::CoreError;
pub use validate::{Violation, decode_request};

pub use model::{
    AnyRef, AssignedObject, Device, DeviceType, Entity, EntityData, EntityKind, IngestRequest,
    IngestResponse, Interface, IpAddress, Manufacturer, Platform, RefError, Resource,
    ResourceKind, Role, Site, Tag, TypeRegistry,
};

pub use diode_api::CallOptions;
