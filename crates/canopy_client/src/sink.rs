//! Rendering sink for incremental output.

/// Display surface the session pushes partial results into.
///
/// Called once per received delta with the **entire** accumulated text, not a
/// diff. Consumers rely on receiving the whole buffer each time; the contract
/// deliberately matches a widget that is re-set wholesale on every update.
pub trait RenderSink: Send {
    fn render(&mut self, label: &str, full_text: &str);
}

/// Closures work as sinks directly.
impl<F> RenderSink for F
where
    F: FnMut(&str, &str) + Send,
{
    fn render(&mut self, label: &str, full_text: &str) {
        self(label, full_text)
    }
}
