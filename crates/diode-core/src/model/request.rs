// ── Request / response envelope ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::Entity;

/// One batch of entities destined for a single stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestRequest {
    pub stream: String,
    pub entities: Vec<Entity>,
    /// Caller-chosen request id; [`IngestRequest::new`] fills a UUIDv4.
    pub id: String,
    pub producer_app_name: String,
    pub producer_app_version: String,
    pub sdk_name: String,
    pub sdk_version: String,
}

impl IngestRequest {
    /// Start a batch identified as coming from this SDK.
    pub fn new(
        stream: impl Into<String>,
        producer_app_name: impl Into<String>,
        producer_app_version: impl Into<String>,
    ) -> Self {
        Self {
            stream: stream.into(),
            entities: Vec::new(),
            id: Uuid::new_v4().to_string(),
            producer_app_name: producer_app_name.into(),
            producer_app_version: producer_app_version.into(),
            sdk_name: diode_api::SDK_NAME.into(),
            sdk_version: diode_api::SDK_VERSION.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.entities.extend(entities);
        self
    }
}

/// Outcome of an ingest call that reached the distributor.
///
/// Errors are batch-scoped: a message may name a field path, but there is no
/// index contract correlating messages with entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub errors: Vec<String>,
}

impl IngestResponse {
    /// `true` when the batch was accepted in full.
    pub fn is_accepted(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Device, Entity};

    #[test]
    fn new_fills_identity_fields() {
        let request = IngestRequest::new("nb", "collector", "1.2.3");
        assert!(Uuid::parse_str(&request.id).is_ok());
        assert_eq!(request.sdk_name, "diode-sdk-rust");
        assert_eq!(request.sdk_version, env!("CARGO_PKG_VERSION"));
        assert!(request.entities.is_empty());
    }

    #[test]
    fn ids_are_unique_per_request() {
        let a = IngestRequest::new("nb", "collector", "1.0.0");
        let b = IngestRequest::new("nb", "collector", "1.0.0");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn builders_append() {
        let request = IngestRequest::new("nb", "collector", "1.0.0")
            .with_id("abc-1")
            .with_entity(Entity::new(Device::new("rtr1")))
            .with_entities([Entity::new(Device::new("rtr2"))]);
        assert_eq!(request.id, "abc-1");
        assert_eq!(request.entities.len(), 2);
    }
}
