//! Cancellable, polled kernel jobs.
//!
//! Boolean operations on heavily textured geometry can stall inside the
//! kernel. Every boolean is therefore issued as a job on a worker thread
//! and polled to completion. Jobs are functional: inputs are immutable
//! handles and the result is a fresh handle, so abandoning a job on
//! timeout or cancellation can never leave partially mutated geometry
//! visible to later stages — an uncommitted result is simply dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::{KernelError, KernelResult};

/// Cooperative cancellation flag shared with a running job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Status returned by [`KernelJob::try_poll`].
#[derive(Debug)]
pub enum JobStatus<T> {
    /// Still executing.
    Running,
    /// Finished successfully; the result has been taken.
    Done(T),
    /// Finished with an error.
    Failed(KernelError),
}

/// A kernel operation running on a worker thread.
///
/// Dropping the job cancels it; the worker's eventual result is
/// discarded unseen.
#[derive(Debug)]
pub struct KernelJob<T> {
    rx: Receiver<KernelResult<T>>,
    token: CancelToken,
}

impl<T: Send + 'static> KernelJob<T> {
    /// Start `op` on a worker thread.
    ///
    /// The closure receives a [`CancelToken`] it may check at safe
    /// points; kernels that cannot check mid-operation simply run to
    /// completion and have their result dropped.
    pub fn spawn<F>(op: F) -> Self
    where
        F: FnOnce(&CancelToken) -> KernelResult<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let token = CancelToken::new();
        let worker_token = token.clone();
        thread::spawn(move || {
            let result = if worker_token.is_cancelled() {
                Err(KernelError::Cancelled)
            } else {
                op(&worker_token)
            };
            // Receiver may be gone if the job was abandoned.
            let _ = tx.send(result);
        });
        Self { rx, token }
    }

    /// Non-blocking poll.
    pub fn try_poll(&self) -> JobStatus<T> {
        match self.rx.try_recv() {
            Ok(Ok(value)) => JobStatus::Done(value),
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(TryRecvError::Empty) => JobStatus::Running,
            Err(TryRecvError::Disconnected) => JobStatus::Failed(KernelError::WorkerVanished),
        }
    }

    /// Request cancellation without consuming the job.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Block until the job finishes or `timeout` elapses.
    ///
    /// On timeout the job is cancelled and abandoned; the worker keeps
    /// running but its result can no longer be observed.
    pub fn join(self, timeout: Duration) -> KernelResult<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                self.token.cancel();
                Err(KernelError::Timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(KernelError::WorkerVanished),
        }
    }
}

/// Run a boolean operation with bounded retries.
///
/// Each attempt is a fresh job; a timed-out attempt is abandoned, never
/// resumed. `retries` is the number of attempts *after* the first.
pub fn run_with_retries<T, F>(
    label: &str,
    retries: u32,
    timeout: Duration,
    op: F,
) -> KernelResult<T>
where
    T: Send + 'static,
    F: Fn(&CancelToken) -> KernelResult<T> + Send + Clone + 'static,
{
    let attempts = retries + 1;
    let mut last = KernelError::WorkerVanished;
    for attempt in 1..=attempts {
        let job = KernelJob::spawn(op.clone());
        match job.join(timeout) {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(op = label, attempt, "kernel operation recovered");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(op = label, attempt, error = %e, "kernel operation failed");
                last = e;
            }
        }
    }
    Err(KernelError::RetriesExhausted {
        op: label.to_string(),
        attempts,
        last: Box::new(last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_completes() {
        let job = KernelJob::spawn(|_| Ok(42u32));
        assert_eq!(job.join(Duration::from_secs(1)).unwrap(), 42);
    }

    #[test]
    fn test_job_reports_failure() {
        let job: KernelJob<u32> =
            KernelJob::spawn(|_| Err(KernelError::BooleanFailed("test".into())));
        assert!(matches!(
            job.join(Duration::from_secs(1)),
            Err(KernelError::BooleanFailed(_))
        ));
    }

    #[test]
    fn test_job_timeout_abandons() {
        let job = KernelJob::spawn(|token: &CancelToken| {
            while !token.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
            Ok(0u32)
        });
        let result = job.join(Duration::from_millis(50));
        assert!(matches!(result, Err(KernelError::Timeout(_))));
    }

    #[test]
    fn test_poll_transitions_to_done() {
        let job = KernelJob::spawn(|_| {
            thread::sleep(Duration::from_millis(20));
            Ok(7u32)
        });
        let mut done = None;
        for _ in 0..200 {
            match job.try_poll() {
                JobStatus::Running => thread::sleep(Duration::from_millis(5)),
                JobStatus::Done(v) => {
                    done = Some(v);
                    break;
                }
                JobStatus::Failed(e) => panic!("job failed: {e}"),
            }
        }
        assert_eq!(done, Some(7));
    }

    #[test]
    fn test_retries_recover() {
        use std::sync::atomic::AtomicU32;
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = run_with_retries("flaky", 2, Duration::from_secs(1), move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(KernelError::BooleanFailed("transient".into()))
            } else {
                Ok(9u32)
            }
        });
        assert_eq!(result.unwrap(), 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_retries_exhaust() {
        let result: KernelResult<u32> =
            run_with_retries("doomed", 1, Duration::from_secs(1), |_| {
                Err(KernelError::BooleanFailed("always".into()))
            });
        match result {
            Err(KernelError::RetriesExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
