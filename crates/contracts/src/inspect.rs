//! Inspector trait - debug output interface

/// Receives rendered payloads and responses in debug modes
pub trait Inspector: Send + Sync {
    /// Inspector name (used for logging)
    fn name(&self) -> &str;

    /// Show one rendered block
    ///
    /// `label` is `"payload"` or `"response"`.
    fn inspect(&self, label: &str, rendered: &str);
}
