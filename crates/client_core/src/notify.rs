use tracing::warn;

/// User-facing toast payload. The core never renders anything itself; it
/// hands these to whatever notification collaborator the shell injects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Default sink for headless consumers: notices go to the log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        warn!(title = %notice.title, detail = %notice.detail, "user notice");
    }
}
