//! Upload to e-z.host.
//!
//! Each attempt is one multipart POST with the API key in a `key` header.
//! Network-class failures are retried with growing timeouts and jittered
//! exponential backoff; HTTP error statuses are final.

pub mod client;
pub mod retry;
pub mod types;

pub use client::{HttpTransport, UPLOAD_ENDPOINT, UploadClient, UploadTransport};
pub use retry::{Jitter, RandomJitter, RetryPolicy, Sleeper, TokioSleeper};
pub use types::{TransportError, TransportErrorKind, TransportResponse, UploadError};
