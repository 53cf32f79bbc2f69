use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug)]
struct Pending {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

/// Runs only the most recently scheduled job, once `delay` has passed
/// without another one being scheduled. A job whose delay already elapsed is
/// left to finish; callers drop its output by generation.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Cancel a job still waiting out its delay and schedule `job`
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
            job.await;
        });
        self.pending = Some(Pending { handle, fired });
    }

    /// Drop the waiting job. One that already started keeps running detached.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.fired.load(Ordering::SeqCst) {
                pending.handle.abort();
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_the_last_job_runs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::default();

        for n in 0..3 {
            let tx = tx.clone();
            debouncer.schedule(async move {
                let _ = tx.send(n);
            });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(rx.try_recv(), Ok(2));
        assert!(rx.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_the_pending_job() {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(async move {
            let _ = tx.send(());
        });
        assert!(debouncer.is_pending());
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_job_is_not_aborted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::default();

        let slow = tx.clone();
        debouncer.schedule(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let _ = slow.send("first");
        });
        // past the delay, the first job is in flight
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.schedule(async move {
            let _ = tx.send("second");
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.try_recv(), Ok("second"));
        assert_eq!(rx.try_recv(), Ok("first"));
    }
}
