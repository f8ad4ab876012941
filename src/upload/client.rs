use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::retry::{Jitter, RandomJitter, RetryPolicy, Sleeper, TokioSleeper};
use super::types::{
    TransportError, TransportErrorKind, TransportResponse, UploadError, UploadResponse,
};

/// Fixed upload endpoint.
pub const UPLOAD_ENDPOINT: &str = "https://api.e-z.host/files";

/// Sends one upload attempt.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(
        &self,
        image: &[u8],
        api_key: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

/// Multipart POST over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ezshot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UploadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(
        &self,
        image: &[u8],
        api_key: &str,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let part = Part::bytes(image.to_vec())
            .file_name("screenshot.png")
            .mime_str("image/png")
            .map_err(classify)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .header("key", api_key)
            .multipart(form)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status().as_u16();
        settle_body(status, response.text().await, classify)
    }
}

/// Pairs a status with its body.
///
/// A body that cannot be read only fails the attempt on success statuses;
/// an error status is reported as-is so it is never retried.
fn settle_body<E: std::fmt::Display>(
    status: u16,
    body: Result<String, E>,
    on_error: impl FnOnce(E) -> TransportError,
) -> Result<TransportResponse, TransportError> {
    match body {
        Ok(body) => Ok(TransportResponse { status, body }),
        Err(e) if (200..300).contains(&status) => Err(on_error(e)),
        Err(e) => Ok(TransportResponse {
            status,
            body: format!("<unreadable body: {}>", e),
        }),
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    };
    TransportError::new(kind, err.to_string())
}

/// Uploads images with retry, backoff and response parsing.
pub struct UploadClient {
    transport: Arc<dyn UploadTransport>,
    sleeper: Arc<dyn Sleeper>,
    jitter: Arc<dyn Jitter>,
    policy: RetryPolicy,
    show_progress: bool,
}

impl UploadClient {
    pub fn new(transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
            policy: RetryPolicy::default(),
            show_progress: false,
        }
    }

    /// Client for the production endpoint.
    pub fn e_z_host() -> Result<Self, UploadError> {
        Ok(Self::new(Arc::new(HttpTransport::new(UPLOAD_ENDPOINT)?)))
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Uploads `image` and returns the URL reported by the server.
    ///
    /// Network-class failures are retried; any HTTP response ends the loop.
    pub async fn upload(&self, image: &[u8], api_key: &str) -> Result<String, UploadError> {
        let mut last_error = None;
        let mut dots = 0;

        for attempt in 0..self.policy.max_attempts {
            let timeout = self.policy.timeout_for(attempt);
            log::debug!(
                "Upload attempt {}/{} ({} bytes, timeout {:?})",
                attempt + 1,
                self.policy.max_attempts,
                image.len(),
                timeout
            );

            match self.transport.send(image, api_key, timeout).await {
                Ok(response) => {
                    if dots > 0 {
                        eprintln!();
                    }
                    return parse_response(response);
                }
                Err(err) => {
                    log::warn!("Upload attempt {} failed: {}", attempt + 1, err);
                    if self.show_progress {
                        eprint!(".");
                        dots += 1;
                    }
                    last_error = Some(err);

                    if self.policy.has_next(attempt) {
                        let delay = self.policy.backoff_delay(attempt, self.jitter.sample());
                        log::info!("Retrying upload in {:.1}s", delay.as_secs_f64());
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        if dots > 0 {
            eprintln!();
        }
        Err(UploadError::Network {
            attempts: self.policy.max_attempts,
            message: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempts were made".to_string()),
        })
    }
}

fn parse_response(response: TransportResponse) -> Result<String, UploadError> {
    if !(200..300).contains(&response.status) {
        return Err(UploadError::Http {
            status: response.status,
            body: response.body,
        });
    }

    let parsed: UploadResponse = serde_json::from_str(&response.body)
        .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;

    match parsed.image_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() && url != "null" => {
            log::info!("Upload complete: {}", url);
            Ok(url.to_string())
        }
        _ => Err(UploadError::EmptyUploadResult),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use mockito::Server;

    const RESPONSE_OK: &str = r#"{"success":true,"imageUrl":"https://api.e-z.host/files/abc123.png"}"#;

    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        timeouts: Mutex<Vec<Duration>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                timeouts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl UploadTransport for ScriptedTransport {
        async fn send(
            &self,
            _image: &[u8],
            _api_key: &str,
            timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            self.timeouts.lock().unwrap().push(timeout);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra attempt")
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    struct FixedJitter(f64);

    impl Jitter for FixedJitter {
        fn sample(&self) -> f64 {
            self.0
        }
    }

    fn ok(body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn timed_out() -> Result<TransportResponse, TransportError> {
        Err(TransportError::timeout(Duration::from_secs(5)))
    }

    fn client_with(transport: Arc<ScriptedTransport>, sleeper: Arc<RecordingSleeper>) -> UploadClient {
        UploadClient::new(transport)
            .with_sleeper(sleeper)
            .with_jitter(Arc::new(FixedJitter(0.25)))
    }

    #[tokio::test]
    async fn two_timeouts_then_success_sleeps_twice() {
        let transport = ScriptedTransport::new(vec![timed_out(), timed_out(), ok(RESPONSE_OK)]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client_with(transport.clone(), sleeper.clone());

        let url = client.upload(b"png", "test-api-key").await.unwrap();
        assert_eq!(url, "https://api.e-z.host/files/abc123.png");

        assert_eq!(
            *sleeper.sleeps.lock().unwrap(),
            vec![Duration::from_millis(1250), Duration::from_millis(2250)]
        );
        assert_eq!(
            *transport.timeouts.lock().unwrap(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(10),
                Duration::from_secs(15)
            ]
        );
    }

    #[tokio::test]
    async fn exhausted_retries_do_not_sleep_after_last_attempt() {
        let connect = || {
            Err(TransportError::new(
                TransportErrorKind::Connect,
                "connection refused",
            ))
        };
        let transport = ScriptedTransport::new(vec![connect(), connect(), connect()]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client_with(transport, sleeper.clone());

        let err = client.upload(b"png", "test-api-key").await.unwrap_err();
        assert!(matches!(err, UploadError::Network { attempts: 3, .. }));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(sleeper.sleeps.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn http_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![Ok(TransportResponse {
            status: 401,
            body: "invalid key".to_string(),
        })]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client_with(transport.clone(), sleeper.clone());

        let err = client.upload(b"png", "test-api-key").await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Http { status: 401, ref body } if body == "invalid key"
        ));
        assert_eq!(transport.timeouts.lock().unwrap().len(), 1);
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[test]
    fn response_parsing() {
        let parse = |body: &str| {
            parse_response(TransportResponse {
                status: 200,
                body: body.to_string(),
            })
        };

        assert_eq!(
            parse(RESPONSE_OK).unwrap(),
            "https://api.e-z.host/files/abc123.png"
        );
        assert_eq!(parse(r#"{"url":"https://x/y.png"}"#).unwrap(), "https://x/y.png");
        assert!(matches!(parse(r#"{"imageUrl":null}"#), Err(UploadError::EmptyUploadResult)));
        assert!(matches!(parse(r#"{"imageUrl":"null"}"#), Err(UploadError::EmptyUploadResult)));
        assert!(matches!(parse(r#"{"imageUrl":""}"#), Err(UploadError::EmptyUploadResult)));
        assert!(matches!(parse("{}"), Err(UploadError::EmptyUploadResult)));
        assert!(matches!(parse("<html>"), Err(UploadError::InvalidResponse(_))));
    }

    #[test]
    fn unreadable_error_body_still_reports_status() {
        let settled = settle_body(502, Err("connection reset"), |e: &str| {
            TransportError::new(TransportErrorKind::Other, e)
        })
        .unwrap();
        assert_eq!(settled.status, 502);
        assert!(settled.body.contains("connection reset"));
        assert!(matches!(
            parse_response(settled),
            Err(UploadError::Http { status: 502, .. })
        ));
    }

    #[test]
    fn unreadable_success_body_fails_the_attempt() {
        let err = settle_body(200, Err("connection reset"), |e: &str| {
            TransportError::new(TransportErrorKind::Other, e)
        })
        .unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Other);
    }

    #[tokio::test]
    async fn unreadable_error_body_is_not_retried() {
        let transport = ScriptedTransport::new(vec![settle_body(
            503,
            Err("truncated"),
            |e: &str| TransportError::new(TransportErrorKind::Other, e),
        )]);
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client_with(transport.clone(), sleeper.clone());

        let err = client.upload(b"png", "test-api-key").await.unwrap_err();
        assert!(matches!(err, UploadError::Http { status: 503, .. }));
        assert_eq!(transport.timeouts.lock().unwrap().len(), 1);
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn posts_multipart_with_key_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/files")
            .match_header("key", "test-api-key")
            .match_header(
                "content-type",
                mockito::Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(mockito::Matcher::Regex(
                r#"name="file"; filename="screenshot.png""#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(RESPONSE_OK)
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new(format!("{}/files", server.url())).unwrap();
        let client = UploadClient::new(Arc::new(transport));
        let url = client.upload(b"fake image bytes", "test-api-key").await.unwrap();

        mock.assert_async().await;
        assert_eq!(url, "https://api.e-z.host/files/abc123.png");
    }

    #[tokio::test]
    async fn server_error_makes_exactly_one_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/files")
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create_async()
            .await;

        let transport = HttpTransport::new(format!("{}/files", server.url())).unwrap();
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = UploadClient::new(Arc::new(transport)).with_sleeper(sleeper.clone());
        let err = client.upload(b"fake image bytes", "test-api-key").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, UploadError::Http { status: 500, .. }));
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn null_image_url_is_an_empty_result() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/files")
            .with_status(200)
            .with_body(r#"{"imageUrl":null}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(format!("{}/files", server.url())).unwrap();
        let client = UploadClient::new(Arc::new(transport));
        let err = client.upload(b"fake image bytes", "test-api-key").await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyUploadResult));
    }
}
