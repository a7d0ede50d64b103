use tokio::task::JoinHandle;

/// Owned handle to a background task. Dropping the handle aborts the task, so
/// a recurring job can never outlive the view that started it.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    inner: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tracing::debug!(task = name, "spawned");
        Self {
            name,
            inner: Some(tokio::spawn(future)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
            tracing::debug!(task = self.name, "cancelled");
        }
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_drop_stops_recurring_task() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let handle = TaskHandle::spawn("counter", async move {
            loop {
                c.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(handle);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let after_drop = counter.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), after_drop);
        assert!(after_drop > 0);
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let mut handle = TaskHandle::spawn("idle", std::future::pending());
        assert!(!handle.is_finished());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_finished());
        assert_eq!(handle.name(), "idle");
    }
}
