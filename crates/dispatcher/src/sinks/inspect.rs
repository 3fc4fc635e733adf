//! Inspectors - where debug renderings go

use contracts::Inspector;
use std::sync::Mutex;
use tracing::info;

/// Prints each block to stdout
#[derive(Debug, Clone)]
pub struct StdoutInspector {
    name: String,
}

impl StdoutInspector {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for StdoutInspector {
    fn default() -> Self {
        Self::new("stdout")
    }
}

impl Inspector for StdoutInspector {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, label: &str, rendered: &str) {
        println!("--- {label} ---");
        println!("{rendered}");
    }
}

/// Logs each block via tracing
#[derive(Debug, Clone)]
pub struct LogInspector {
    name: String,
}

impl LogInspector {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Inspector for LogInspector {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, label: &str, rendered: &str) {
        info!(inspector = %self.name, label, body = %rendered, "Debug output");
    }
}

/// Keeps every block in memory
#[derive(Debug, Default)]
pub struct BufferInspector {
    name: String,
    entries: Mutex<Vec<(String, String)>>,
}

impl BufferInspector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// `(label, rendered)` pairs in arrival order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.lock().clone()
    }

    /// Remove and return all entries
    pub fn take(&self) -> Vec<(String, String)> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, String)>> {
        // A poisoned buffer still holds valid strings
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Inspector for BufferInspector {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, label: &str, rendered: &str) {
        self.lock().push((label.to_string(), rendered.to_string()));
    }
}
