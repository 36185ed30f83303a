// libs/appointment-cell/src/services/dashboard.rs
use tokio::sync::watch;
use tracing::debug;

/// Invalidation signal for dashboard listing views. Every successful
/// lifecycle transition bumps a version; subscribers re-fetch when the
/// version they rendered falls behind.
#[derive(Clone)]
pub struct DashboardNotifier {
    tx: watch::Sender<u64>,
}

impl DashboardNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    pub fn notify_changed(&self) {
        self.tx.send_modify(|version| *version += 1);
        debug!("Dashboard refresh signalled, version {}", self.version());
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.tx.borrow()
    }
}

impl Default for DashboardNotifier {
    fn default() -> Self {
        Self::new()
    }
}
