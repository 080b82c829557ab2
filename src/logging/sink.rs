// Bounded ring of log entries with a durable recent-window mirror

use crate::logging::{LogEntry, LogLevel};
use crate::session::KeyValueStore;
use chrono::Utc;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Store key for the persisted recent window
pub const LOGS_KEY: &str = "app_logs";

struct Mirror {
    store: Arc<dyn KeyValueStore>,
    max_entries: usize,
}

pub struct LogSink {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
    min_level: LogLevel,
    mirror: Option<Mirror>,
}

impl LogSink {
    /// Memory-only sink keeping at most `capacity` entries
    pub fn new(capacity: usize, min_level: LogLevel) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity: capacity.max(1),
            min_level,
            mirror: None,
        }
    }

    /// Sink that also persists its most recent `max_persisted` entries.
    ///
    /// Entries already persisted by an earlier process seed the ring.
    pub fn with_store(
        capacity: usize,
        min_level: LogLevel,
        store: Arc<dyn KeyValueStore>,
        max_persisted: usize,
    ) -> Self {
        let mut sink = Self::new(capacity, min_level);
        let restored = read_persisted(store.as_ref());
        {
            let entries = sink.entries.get_mut().unwrap_or_else(|p| p.into_inner());
            for entry in restored {
                push_bounded(entries, entry, sink.capacity);
            }
        }
        sink.mirror = Some(Mirror {
            store,
            max_entries: max_persisted,
        });
        sink
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an entry. Entries below the minimum level are discarded.
    pub fn append(&self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        forward_to_tracing(&entry);

        let mut entries = self.lock();
        push_bounded(&mut entries, entry, self.capacity);
        if let Some(mirror) = &self.mirror {
            mirror.write(&entries);
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every entry, including the persisted copy
    pub fn clear(&self) {
        self.lock().clear();
        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.store.remove(LOGS_KEY) {
                tracing::warn!("Failed to clear persisted logs: {}", e);
            }
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries())
    }

    /// Write the export to `dir/opsdash-logs-<timestamp>.json`
    pub fn download(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let json = self.export_json().map_err(std::io::Error::other)?;
        std::fs::create_dir_all(dir)?;
        let file_name = format!("opsdash-logs-{}.json", Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
        let path = dir.join(file_name);
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

impl Mirror {
    fn write(&self, entries: &VecDeque<LogEntry>) {
        let skip = entries.len().saturating_sub(self.max_entries);
        let window: Vec<&LogEntry> = entries.iter().skip(skip).collect();
        let result = serde_json::to_string(&window)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(LOGS_KEY, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            // Not routed through the sink, that would recurse
            tracing::warn!("Failed to persist logs: {}", e);
        }
    }
}

fn push_bounded(entries: &mut VecDeque<LogEntry>, entry: LogEntry, capacity: usize) {
    entries.push_back(entry);
    while entries.len() > capacity {
        entries.pop_front();
    }
}

fn read_persisted(store: &dyn KeyValueStore) -> Vec<LogEntry> {
    match store.get(LOGS_KEY) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable persisted logs: {}", e);
            Vec::new()
        }),
        None => Vec::new(),
    }
}

fn forward_to_tracing(entry: &LogEntry) {
    let category = entry.category.as_str();
    let data = entry.data.as_ref().map(|d| d.to_string()).unwrap_or_default();
    match entry.level {
        LogLevel::Debug => tracing::debug!(category = %category, data = %data, "{}", entry.message),
        LogLevel::Info => tracing::info!(category = %category, data = %data, "{}", entry.message),
        LogLevel::Warn => tracing::warn!(category = %category, data = %data, "{}", entry.message),
        LogLevel::Error => {
            let error = entry.error.as_ref().map(|e| e.message.as_str()).unwrap_or_default();
            tracing::error!(category = %category, data = %data, error = %error, "{}", entry.message)
        }
    }
}
