// ── Ingest handler ──
//
// Schema violations are answered in-band with a successful status and a
// non-empty `errors` list. Only sink failures surface as a gRPC status.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::{debug, warn};

use diode_api::proto::v1::ingester_service_server::IngesterService;
use diode_api::proto::v1::{IngestRequest, IngestResponse};
use diode_core::decode_request;

use crate::sink::Sink;

/// `IngesterService` implementation backed by a [`Sink`].
#[derive(Debug)]
pub struct IngestService<S> {
    sink: Arc<S>,
}

impl<S: Sink> IngestService<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }
}

#[tonic::async_trait]
impl<S: Sink> IngesterService for IngestService<S> {
    async fn ingest(
        &self,
        request: Request<IngestRequest>,
    ) -> Result<Response<IngestResponse>, Status> {
        let request = request.into_inner();
        let id = request.id.clone();
        debug!(%id, stream = %request.stream, entities = request.entities.len(), "ingest call");

        let request = match decode_request(request) {
            Ok(request) => request,
            Err(violations) => {
                warn!(%id, violations = violations.len(), "rejected invalid batch");
                let errors = violations.iter().map(ToString::to_string).collect();
                return Ok(Response::new(IngestResponse { errors }));
            }
        };

        self.sink.forward(request).await.map_err(|err| {
            warn!(%id, error = %err, "sink refused batch");
            Status::unavailable(err.to_string())
        })?;

        Ok(Response::new(IngestResponse::default()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use diode_core::{Device, Entity};

    use super::*;
    use crate::sink::{Acknowledge, SinkError};

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Sink for Recording {
        async fn forward(&self, request: diode_core::IngestRequest) -> Result<(), SinkError> {
            self.seen.lock().unwrap().push(request.id);
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Sink for Broken {
        async fn forward(&self, _request: diode_core::IngestRequest) -> Result<(), SinkError> {
            Err(SinkError::new("queue full"))
        }
    }

    fn valid() -> IngestRequest {
        diode_core::IngestRequest::new("nb", "collector", "1.0.0")
            .with_id("abc-1")
            .with_entity(Entity::new(Device::new("rtr1").with_serial("SN1")))
            .into()
    }

    #[tokio::test]
    async fn valid_batch_is_forwarded_and_acknowledged() {
        let sink = Arc::new(Recording::default());
        let service = IngestService::new(Arc::clone(&sink));

        let response = service.ingest(Request::new(valid())).await.unwrap();
        assert!(response.into_inner().errors.is_empty());
        assert_eq!(*sink.seen.lock().unwrap(), vec!["abc-1".to_owned()]);
    }

    #[tokio::test]
    async fn invalid_batch_is_answered_in_band() {
        let sink = Arc::new(Recording::default());
        let service = IngestService::new(Arc::clone(&sink));
        let mut request = valid();
        request.sdk_version = "0.1".into();

        let response = service.ingest(Request::new(request)).await.unwrap();
        let errors = response.into_inner().errors;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("sdk_version: "));
        assert!(sink.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_unavailable() {
        let service = IngestService::new(Arc::new(Broken));
        let status = service.ingest(Request::new(valid())).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unavailable);
        assert_eq!(status.message(), "sink unavailable: queue full");
    }

    #[tokio::test]
    async fn acknowledge_accepts_everything_valid() {
        let service = IngestService::new(Arc::new(Acknowledge));
        let response = service.ingest(Request::new(valid())).await.unwrap();
        assert!(response.into_inner().errors.is_empty());
    }
}
