//! External control signals: `pause`, `resume`, `stop`, `stop(emergency=true)`.
//!
//! Modeled as `tokio::sync::watch` channels rather than a shared mutex flag,
//! so [`crate::scroll::ScrollManager::advance_until`] and
//! [`crate::boundary::resolve`] can each hold their own cheap receiver.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopKind {
    Graceful,
    Emergency,
}

/// Held by the caller that drives the controller; each method is
/// fire-and-forget since the controller polls at its own suspension points.
#[derive(Clone)]
pub struct ControlHandle {
    pause_tx: watch::Sender<bool>,
    stop_tx: watch::Sender<Option<StopKind>>,
}

/// Held by the controller; cloned receivers are cheap and each side observes
/// the latest value independently.
pub struct ControlSignals {
    pub pause_rx: watch::Receiver<bool>,
    pub stop_rx: watch::Receiver<Option<StopKind>>,
}

impl ControlHandle {
    pub fn pause(&self) {
        let _ = self.pause_tx.send(true);
    }

    pub fn resume(&self) {
        let _ = self.pause_tx.send(false);
    }

    pub fn stop(&self) {
        let _ = self.stop_tx.send(Some(StopKind::Graceful));
    }

    /// A second `stop` call while already stopping escalates to emergency,
    /// matching the CLI's double-`SIGINT` contract.
    pub fn stop_emergency(&self) {
        let _ = self.stop_tx.send(Some(StopKind::Emergency));
    }
}

#[must_use]
pub fn channel() -> (ControlHandle, ControlSignals) {
    let (pause_tx, pause_rx) = watch::channel(false);
    let (stop_tx, stop_rx) = watch::channel(None);
    (ControlHandle { pause_tx, stop_tx }, ControlSignals { pause_rx, stop_rx })
}

impl ControlSignals {
    #[must_use]
    pub fn is_paused(&self) -> bool {
        *self.pause_rx.borrow()
    }

    #[must_use]
    pub fn stop_kind(&self) -> Option<StopKind> {
        *self.stop_rx.borrow()
    }

    /// Block until `pause` is lifted, checking `stop` at the same time so a
    /// paused run can still be stopped.
    pub async fn wait_while_paused(&mut self) {
        while self.is_paused() && self.stop_kind().is_none() {
            if self.pause_rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// A cancellation view compatible with [`crate::scroll::ScrollManager`]
    /// and [`crate::boundary::resolve`], which only distinguish
    /// stopped-or-not.
    #[must_use]
    pub fn as_cancel_watch(&self) -> watch::Receiver<bool> {
        let (tx, rx) = watch::channel(self.stop_kind().is_some());
        let mut stop_rx = self.stop_rx.clone();
        tokio::spawn(async move {
            while stop_rx.changed().await.is_ok() {
                if tx.send(stop_rx.borrow().is_some()).is_err() {
                    return;
                }
            }
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pause_then_resume_unblocks_wait() {
        let (handle, mut signals) = channel();
        handle.pause();
        assert!(signals.is_paused());

        let waiter = tokio::spawn(async move {
            signals.wait_while_paused().await;
            signals
        });
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        handle.resume();
        let signals = waiter.await.unwrap();
        assert!(!signals.is_paused());
    }

    #[test]
    fn stop_escalates_to_emergency() {
        let (handle, signals) = channel();
        handle.stop();
        assert_eq!(signals.stop_kind(), Some(StopKind::Graceful));
        handle.stop_emergency();
        assert_eq!(signals.stop_kind(), Some(StopKind::Emergency));
    }
}
