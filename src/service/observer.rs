use url::Url;

/// Side channel for watching the automation session while a consultation is
/// in flight.
///
/// The workflow signals `open` when a submission starts (only when a
/// live-view URL is configured) and `close` once it settles. Implementations
/// own the actual viewer lifecycle; the workflow never touches it outside
/// those two signals.
pub trait ObserverSink: Send + Sync {
    fn open(&self, url: &Url);
    fn close(&self);
}

/// Default sink: surfaces the live-view URL through the log stream instead
/// of opening a window.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ObserverSink for LogObserver {
    fn open(&self, url: &Url) {
        tracing::info!(url = %url, "Sesión en vivo disponible");
    }

    fn close(&self) {
        tracing::debug!("Sesión en vivo finalizada");
    }
}
