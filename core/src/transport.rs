//! The seam between request building and actual network I/O.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// A transport-level failure: the server could not be reached at all.
/// Status-code interpretation never happens here — a 4xx/5xx response is
/// still an `Ok` at this layer.
#[derive(Debug)]
pub struct TransportError(pub String);

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::NetworkUnreachable(err.0)
    }
}

/// Executes an `HttpRequest` and returns the raw `HttpResponse`.
///
/// Implementations must return non-success statuses as data rather than
/// errors; the client's `parse_*` methods own status interpretation.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
