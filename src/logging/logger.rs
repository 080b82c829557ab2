// Category-scoped loggers over a shared sink

use crate::logging::{ErrorDetail, LogEntry, LogLevel, LogSink};
use serde_json::Value;
use std::sync::Arc;

/// Hands out loggers that all append to one sink
#[derive(Clone)]
pub struct LoggerFactory {
    sink: Arc<LogSink>,
}

impl LoggerFactory {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self { sink }
    }

    pub fn logger(&self, category: impl Into<String>) -> Logger {
        Logger {
            sink: self.sink.clone(),
            category: category.into(),
        }
    }

    pub fn sink(&self) -> &Arc<LogSink> {
        &self.sink
    }
}

#[derive(Clone)]
pub struct Logger {
    sink: Arc<LogSink>,
    category: String,
}

impl Logger {
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Logger for a sub-area, categorised as `parent:name`
    pub fn child(&self, name: &str) -> Logger {
        Logger {
            sink: self.sink.clone(),
            category: format!("{}:{}", self.category, name),
        }
    }

    pub fn debug(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(LogLevel::Debug, message.into(), data, None);
    }

    pub fn info(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(LogLevel::Info, message.into(), data, None);
    }

    pub fn warn(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(LogLevel::Warn, message.into(), data, None);
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>, error: Option<ErrorDetail>) {
        self.log(LogLevel::Error, message.into(), data, error);
    }

    fn log(&self, level: LogLevel, message: String, data: Option<Value>, error: Option<ErrorDetail>) {
        self.sink.append(
            LogEntry::new(level, self.category.clone(), message)
                .with_data(data)
                .with_error(error),
        );
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").field("category", &self.category).finish()
    }
}
