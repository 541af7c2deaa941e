// ── Call authentication ──
//
// Every call must carry exactly one `diode-api-key` metadata value equal to
// one of the configured keys. The check runs before the handler, and keys
// are compared in constant time.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use subtle::{Choice, ConstantTimeEq};
use tonic::service::Interceptor;
use tonic::{Request, Status};
use tracing::warn;

use diode_api::API_KEY_METADATA_KEY;

/// Status message returned for every rejected call.
pub const UNAUTHENTICATED_MESSAGE: &str = "missing or invalid authorization header";

/// Server-side interceptor holding the accepted keys.
#[derive(Clone)]
pub struct ApiKeyAuth {
    keys: Arc<[SecretString]>,
}

impl ApiKeyAuth {
    /// An empty key set rejects every call.
    pub fn new(keys: impl IntoIterator<Item = SecretString>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Compares against every configured key without stopping early.
    pub fn is_authorized(&self, presented: &str) -> bool {
        let presented = presented.as_bytes();
        self.keys
            .iter()
            .fold(Choice::from(0), |found, key| {
                found | key.expose_secret().as_bytes().ct_eq(presented)
            })
            .into()
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl Interceptor for ApiKeyAuth {
    fn call(&mut self, request: Request<()>) -> Result<Request<()>, Status> {
        let mut values = request.metadata().get_all(API_KEY_METADATA_KEY).iter();
        let authorized = match (values.next(), values.next()) {
            (Some(value), None) => value.to_str().is_ok_and(|key| self.is_authorized(key)),
            _ => false,
        };

        if authorized {
            Ok(request)
        } else {
            warn!(remote = ?request.remote_addr(), "rejected call: {UNAUTHENTICATED_MESSAGE}");
            Err(Status::unauthenticated(UNAUTHENTICATED_MESSAGE))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn auth(keys: &[&str]) -> ApiKeyAuth {
        ApiKeyAuth::new(keys.iter().map(|k| SecretString::from((*k).to_owned())))
    }

    fn request_with(keys: &[&str]) -> Request<()> {
        let mut request = Request::new(());
        for key in keys {
            request
                .metadata_mut()
                .append(API_KEY_METADATA_KEY, key.parse().unwrap());
        }
        request
    }

    #[test]
    fn accepts_any_configured_key() {
        let mut interceptor = auth(&["alpha", "beta"]);
        assert!(interceptor.call(request_with(&["beta"])).is_ok());
    }

    #[test]
    fn rejects_missing_unknown_and_duplicate_keys() {
        let mut interceptor = auth(&["alpha"]);
        for keys in [&[][..], &["gamma"][..], &["alpha", "alpha"][..], &["alph"][..]] {
            let status = interceptor.call(request_with(keys)).unwrap_err();
            assert_eq!(status.code(), tonic::Code::Unauthenticated, "{keys:?}");
            assert_eq!(status.message(), UNAUTHENTICATED_MESSAGE);
        }
    }

    #[test]
    fn empty_key_set_rejects_everything() {
        let mut interceptor = auth(&[]);
        assert!(interceptor.call(request_with(&["anything"])).is_err());
        assert!(interceptor.call(request_with(&[""])).is_err());
    }

    #[test]
    fn debug_hides_keys() {
        assert!(!format!("{:?}", auth(&["hunter2"])).contains("hunter2"));
    }
}
