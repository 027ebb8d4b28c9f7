// Cooperative session cancellation

use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable stop signal. Once triggered it stays triggered.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Resolves once the handle has been triggered
    pub async fn triggered(&self) {
        let mut receiver = self.subscribe();
        // The sender lives as long as `self`, so this only returns on trigger
        let _ = receiver.wait_for(|stopped| *stopped).await;
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_is_sticky_and_shared() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_triggered());

        handle.trigger();
        handle.trigger();
        assert!(clone.is_triggered());
        assert!(*clone.subscribe().borrow());
    }

    #[tokio::test]
    async fn test_triggered_wakes_waiter() {
        let handle = ShutdownHandle::new();
        let waiter = handle.clone();

        let task = tokio::spawn(async move { waiter.triggered().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.trigger();

        tokio::time::timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }
}
