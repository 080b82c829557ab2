// Shared JSON client used by every feature service

use crate::error::{ClientError, TransportError};
use crate::http::{ClientContext, OutgoingRequest, RequestOptions, TransportResponse};
use crate::logging::{ErrorDetail, Logger};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Why a single attempt produced no response
enum AttemptError {
    TimedOut,
    Transport(TransportError),
}

/// Authenticated JSON client bound to one base URL and log category.
///
/// Each call attaches the stored bearer token, arms a timeout per attempt,
/// resends once on a retryable gateway status, and classifies failures into
/// [`ClientError`]. A 401 clears the session and notifies the context's
/// [`SessionListener`](crate::session::SessionListener).
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    logger: Logger,
    ctx: ClientContext,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, service_name: &str, ctx: &ClientContext) -> Self {
        Self {
            base_url: base_url.into(),
            logger: ctx.loggers.logger(service_name),
            ctx: ctx.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_body(endpoint, Method::POST, body).await
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_body(endpoint, Method::PUT, body).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_with_body(endpoint, Method::PATCH, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ClientError> {
        self.request(endpoint, RequestOptions::new(Method::DELETE)).await
    }

    async fn request_with_body<T, B>(&self, endpoint: &str, method: Method, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(ClientError::Encode)?;
        self.request(endpoint, RequestOptions::new(method).body(body)).await
    }

    /// Execute one logical call against `base_url + endpoint`
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let request = self.build_request(endpoint, options)?;
        let started = Instant::now();

        self.logger.debug(
            format!("{} {}", request.method, endpoint),
            Some(json!({ "method": request.method.as_str(), "endpoint": endpoint, "hasBody": request.has_body() })),
        );

        match self.send_with_retry(&request, endpoint).await {
            Ok(response) => self.handle_response(response, &request, endpoint, started),
            Err(error) => Err(self.classify_failure(error, &request, endpoint, started)),
        }
    }

    fn build_request(&self, endpoint: &str, options: RequestOptions) -> Result<OutgoingRequest, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        if let Some(token) = self.ctx.credentials.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ClientError::InvalidRequest("stored credential is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let body = options
            .body
            .map(|value| serde_json::to_vec(&value))
            .transpose()
            .map_err(ClientError::Encode)?;

        Ok(OutgoingRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, endpoint),
            headers,
            body,
        })
    }

    async fn send_with_retry(
        &self,
        request: &OutgoingRequest,
        endpoint: &str,
    ) -> Result<TransportResponse, AttemptError> {
        let policy = &self.ctx.policy;
        let mut response = self.attempt(request).await?;
        let mut retries = 0;

        while policy.should_retry(response.status.as_u16(), retries) {
            retries += 1;
            self.logger.warn(
                format!(
                    "Received {} from {} {}, retrying in {:?}",
                    response.status.as_u16(),
                    request.method,
                    endpoint,
                    policy.retry_delay
                ),
                Some(json!({ "status": response.status.as_u16(), "attempt": retries + 1 })),
            );
            sleep(policy.retry_delay).await;
            response = self.attempt(request).await?;
        }

        Ok(response)
    }

    /// One send under a freshly armed timeout
    async fn attempt(&self, request: &OutgoingRequest) -> Result<TransportResponse, AttemptError> {
        match timeout(self.ctx.policy.timeout, self.ctx.transport.send(request)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(error)) => Err(AttemptError::Transport(error)),
            Err(_) => Err(AttemptError::TimedOut),
        }
    }

    fn handle_response<T: DeserializeOwned>(
        &self,
        response: TransportResponse,
        request: &OutgoingRequest,
        endpoint: &str,
        started: Instant,
    ) -> Result<T, ClientError> {
        let duration_ms = elapsed_ms(started);
        let status = response.status.as_u16();

        if status == 401 {
            self.expire_session(request, endpoint, duration_ms);
            return Err(ClientError::SessionExpired);
        }

        if !response.status.is_success() {
            let message = server_message(&response.body)
                .unwrap_or_else(|| format!("HTTP Error: {} {}", status, response.status_text()));
            self.logger.error(
                format!("{} {} failed", request.method, endpoint),
                Some(json!({ "status": status, "duration_ms": duration_ms, "message": message })),
                Some(ErrorDetail {
                    name: "HttpError".to_string(),
                    message: message.clone(),
                    stack: None,
                }),
            );
            return Err(ClientError::Http { status, message });
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            self.logger.info(
                format!("{} {} completed with an empty body", request.method, endpoint),
                Some(json!({ "status": status, "duration_ms": duration_ms })),
            );
            return serde_json::from_value(Value::Object(Map::new()))
                .map_err(|e| self.decode_failure(e, request, endpoint, duration_ms));
        }

        let parsed = serde_json::from_slice(&response.body)
            .map_err(|e| self.decode_failure(e, request, endpoint, duration_ms))?;
        self.logger.info(
            format!("{} {} completed", request.method, endpoint),
            Some(json!({
                "status": status,
                "duration_ms": duration_ms,
                "size": format_size(response.body.len()),
            })),
        );
        Ok(parsed)
    }

    fn expire_session(&self, request: &OutgoingRequest, endpoint: &str, duration_ms: u64) {
        self.logger.warn(
            format!("{} {} was rejected as unauthorized, clearing session", request.method, endpoint),
            Some(json!({ "status": 401, "duration_ms": duration_ms })),
        );
        if let Err(e) = self.ctx.credentials.clear() {
            self.logger.warn(format!("Failed to clear stored session: {}", e), None);
        }
        self.ctx.listener.session_expired();
    }

    fn decode_failure(
        &self,
        error: serde_json::Error,
        request: &OutgoingRequest,
        endpoint: &str,
        duration_ms: u64,
    ) -> ClientError {
        self.logger.error(
            format!("{} {} returned an undecodable body", request.method, endpoint),
            Some(json!({ "duration_ms": duration_ms })),
            Some(ErrorDetail::from_error("DecodeError", &error)),
        );
        ClientError::Decode(error)
    }

    fn classify_failure(
        &self,
        error: AttemptError,
        request: &OutgoingRequest,
        endpoint: &str,
        started: Instant,
    ) -> ClientError {
        let duration_ms = elapsed_ms(started);
        let client_error = match error {
            AttemptError::TimedOut => {
                let timeout = self.ctx.policy.timeout;
                self.logger.error(
                    format!("{} {} timed out", request.method, endpoint),
                    Some(json!({ "timeout_ms": timeout.as_millis() as u64, "duration_ms": duration_ms })),
                    None,
                );
                return ClientError::Timeout { timeout };
            }
            AttemptError::Transport(TransportError::Unavailable(reason)) => {
                self.logger.error(
                    format!("Unable to reach server for {} {}", request.method, endpoint),
                    Some(json!({ "url": request.url, "reason": reason, "duration_ms": duration_ms })),
                    None,
                );
                return ClientError::Unavailable {
                    url: request.url.clone(),
                };
            }
            AttemptError::Transport(TransportError::Other(error)) => ClientError::Transport(error),
        };

        self.logger.error(
            format!("{} {} failed", request.method, endpoint),
            Some(json!({ "duration_ms": duration_ms })),
            Some(ErrorDetail::from_error(client_error.kind(), &client_error)),
        );
        client_error
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("category", &self.logger.category())
            .finish()
    }
}

/// Server-supplied error text from a JSON error body, if any
fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|field| value.get(field).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

fn elapsed_ms(started: Instant) -> u64 {
    let elapsed: Duration = started.elapsed();
    elapsed.as_millis() as u64
}

/// Format bytes as human-readable string (e.g., "1.5 KiB")
fn format_size(bytes: usize) -> String {
    use byte_unit::{Byte, UnitType};

    Byte::from_u64(bytes as u64)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}
