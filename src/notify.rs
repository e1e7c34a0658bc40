//! Notification of the host environment after a file has been rewritten.

use std::path::Path;

/// Receives a call after a file was written so the host can drop any cached
/// view of it. Calls are fire-and-forget.
pub trait ChangeNotifier {
    fn file_changed(&self, path: &Path);
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn file_changed(&self, _path: &Path) {}
}

/// Reports every notification as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn file_changed(&self, path: &Path) {
        tracing::info!(path = %path.display(), "file changed");
    }
}

impl<F> ChangeNotifier for F
where
    F: Fn(&Path),
{
    fn file_changed(&self, path: &Path) {
        self(path)
    }
}
