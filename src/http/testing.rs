// Scripted transport for exercising clients without a network

use crate::error::TransportError;
use crate::http::{ClientContext, HttpClient, OutgoingRequest, Transport, TransportResponse};
use crate::logging::{LogLevel, LogSink, LoggerFactory};
use crate::session::{Credentials, KeyValueStore, MemoryStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the transport does for the next request
pub(crate) enum Step {
    Respond(u16, String),
    Delayed(Duration, u16, String),
    Hang,
    Unavailable,
    Fail(String),
}

pub(crate) fn respond(status: u16, body: &str) -> Step {
    Step::Respond(status, body.to_string())
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    sent: Mutex<Vec<OutgoingRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<OutgoingRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutgoingRequest) -> Result<TransportResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        let step = self.steps.lock().unwrap().pop_front();

        let reply = |status: u16, body: String| {
            TransportResponse::new(StatusCode::from_u16(status).unwrap(), body.into_bytes())
        };
        match step {
            Some(Step::Respond(status, body)) => Ok(reply(status, body)),
            Some(Step::Delayed(delay, status, body)) => {
                tokio::time::sleep(delay).await;
                Ok(reply(status, body))
            }
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Ok(reply(200, String::new()))
            }
            Some(Step::Unavailable) => Err(TransportError::Unavailable("connection refused".into())),
            Some(Step::Fail(message)) => Err(TransportError::Other(anyhow::anyhow!(message))),
            None => Err(TransportError::Other(anyhow::anyhow!("script exhausted"))),
        }
    }
}

/// A context wired to a scripted transport and in-memory state
pub(crate) struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub store: Arc<MemoryStore>,
    pub ctx: ClientContext,
    pub expired: Arc<AtomicUsize>,
}

impl Harness {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        let transport = Arc::new(ScriptedTransport::new(steps));
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(LogSink::new(1000, LogLevel::Debug));
        let expired = Arc::new(AtomicUsize::new(0));
        let counter = expired.clone();

        let ctx = ClientContext::new(
            transport.clone(),
            Credentials::new(store.clone() as Arc<dyn KeyValueStore>),
            LoggerFactory::new(sink),
        )
        .with_listener(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        Self {
            transport,
            store,
            ctx,
            expired,
        }
    }

    pub(crate) fn client(&self, service_name: &str) -> HttpClient {
        HttpClient::new("http://backend/api/v1", service_name, &self.ctx)
    }

    pub(crate) fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}
