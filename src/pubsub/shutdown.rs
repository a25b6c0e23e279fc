//! One-shot shutdown latch

use tokio::sync::watch;

/// Latch fired once when the publisher stream ends
pub(crate) struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create an armed latch
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Fire the latch
    ///
    /// Returns `true` only for the call that actually fired it.
    pub(crate) fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| !std::mem::replace(fired, true))
    }

    pub(crate) fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Guard that fires the latch when dropped
    ///
    /// Held across the publish loop so a cancelled publish still releases
    /// every subscriber.
    pub(crate) fn fire_on_drop(&self) -> FireOnDrop<'_> {
        FireOnDrop { shutdown: self }
    }

    pub(crate) fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

pub(crate) struct FireOnDrop<'a> {
    shutdown: &'a Shutdown,
}

impl Drop for FireOnDrop<'_> {
    fn drop(&mut self) {
        self.shutdown.fire();
    }
}

/// Observer side of the latch
pub(crate) struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Wait until the latch fires
    ///
    /// Completes immediately if it already has. A dropped latch counts as fired.
    pub(crate) async fn fired(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}
