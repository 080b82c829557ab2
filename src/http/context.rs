// Shared collaborators injected into every HttpClient

use crate::config::Config;
use crate::error::{OpsdashError, Result};
use crate::http::{RequestPolicy, ReqwestTransport, Transport};
use crate::logging::{LogLevel, LogSink, LoggerFactory};
use crate::session::{Credentials, KeyValueStore, NoopListener, SessionListener};
use std::sync::Arc;

/// Everything clients built for one host application share: the transport,
/// the credential, the log sink and the session-expired reaction.
#[derive(Clone)]
pub struct ClientContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) credentials: Credentials,
    pub(crate) loggers: LoggerFactory,
    pub(crate) listener: Arc<dyn SessionListener>,
    pub(crate) policy: RequestPolicy,
}

impl ClientContext {
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials, loggers: LoggerFactory) -> Self {
        Self {
            transport,
            credentials,
            loggers,
            listener: Arc::new(NoopListener),
            policy: RequestPolicy::default(),
        }
    }

    /// Wire the production stack from configuration over `store`
    pub fn from_config(config: &Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let level: LogLevel = config
            .logging
            .level
            .parse()
            .map_err(OpsdashError::Config)?;
        let sink = LogSink::with_store(
            config.logging.capacity,
            level,
            store.clone(),
            config.logging.persisted_entries,
        );
        let transport = ReqwestTransport::new()?;

        Ok(Self::new(
            Arc::new(transport),
            Credentials::new(store),
            LoggerFactory::new(Arc::new(sink)),
        )
        .with_policy(RequestPolicy::from_config(&config.api)))
    }

    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_policy(mut self, policy: RequestPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn loggers(&self) -> &LoggerFactory {
        &self.loggers
    }

    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }
}
