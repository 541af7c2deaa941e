// API key propagation
//
// The credential travels as call metadata on every request, never in the
// message body. The value is validated once, at channel construction, so a
// bad key surfaces as a configuration failure instead of a per-call one.

use secrecy::{ExposeSecret, SecretString};
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::{Request, Status};

use crate::error::Error;

/// Metadata key carrying the API key on every call.
pub const API_KEY_METADATA_KEY: &str = "diode-api-key";

/// Per-call interceptor that injects the API key into outgoing metadata.
#[derive(Clone)]
pub struct ApiKeyInterceptor {
    value: MetadataValue<Ascii>,
}

impl ApiKeyInterceptor {
    /// Build an interceptor for `api_key`.
    ///
    /// Fails if the key contains characters that cannot appear in an ASCII
    /// metadata value (control characters, non-ASCII).
    pub fn new(api_key: &SecretString) -> Result<Self, Error> {
        let mut value: MetadataValue<Ascii> = api_key
            .expose_secret()
            .parse()
            .map_err(|_| Error::InvalidApiKey("not a valid ASCII metadata value".into()))?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl std::fmt::Debug for ApiKeyInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyInterceptor")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        request
            .metadata_mut()
            .insert(API_KEY_METADATA_KEY, self.value.clone());
        Ok(request)
    }
}
