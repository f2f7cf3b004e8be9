//! Detached background tasks with a shutdown barrier
//!
//! Background work nobody joins (telemetry, image preloading, ...) must be
//! submitted through [`DetachedTasks`]. At exit the frontend calls
//! [`DetachedTasks::wait_for_all_tasks`] once, after the event loop returned,
//! so the process never tears down resources a task still uses.
//!
//! The drain is a quiescence barrier rather than a snapshot: a task spawned
//! while the drain is waiting (including one spawned by another task) is
//! waited on as well.

use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;

#[derive(Default)]
struct Tracker {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Tracker {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(|e| {
            tracing::warn!("Detached task counter mutex poisoned; continuing");
            e.into_inner()
        })
    }
}

/// Decrements the outstanding count when the task finishes, panics, or is
/// dropped without ever running (failed spawn).
struct CompletionGuard {
    tracker: Arc<Tracker>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let mut count = self.tracker.lock();
        *count -= 1;
        if *count == 0 {
            self.tracker.idle.notify_all();
        }
    }
}

/// Cloneable handle to the process's detached task group.
#[derive(Clone, Default)]
pub struct DetachedTasks {
    tracker: Arc<Tracker>,
}

impl DetachedTasks {
    /// Create an empty task group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` on a new named thread without waiting for it.
    ///
    /// The task is counted before the thread starts, so a drain that begins
    /// right after this call returns will wait for it.
    pub fn add_task<F>(&self, name: &str, task: F) -> io::Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        *self.tracker.lock() += 1;
        let guard = CompletionGuard {
            tracker: Arc::clone(&self.tracker),
        };

        let task_name = name.to_string();
        thread::Builder::new()
            .name(format!("detached:{}", name))
            .spawn(move || {
                let _guard = guard;
                tracing::debug!("Detached task '{}' started", task_name);
                task();
                tracing::debug!("Detached task '{}' finished", task_name);
            })
            .map(|_| ())
            .inspect_err(|e| tracing::error!("Failed to spawn detached task '{}': {}", name, e))
    }

    /// Number of tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        *self.tracker.lock()
    }

    /// Block until every tracked task has finished.
    ///
    /// No timeout and no cancellation: this returns only once the group is
    /// idle.
    pub fn wait_for_all_tasks(&self) {
        let count = self.tracker.lock();
        if *count > 0 {
            tracing::info!("Waiting for {} detached task(s) to finish", *count);
        }
        let _idle = self
            .tracker
            .idle
            .wait_while(count, |count| *count > 0)
            .unwrap_or_else(|e| {
                tracing::warn!("Detached task condvar wait mutex poisoned; continuing");
                e.into_inner()
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn test_drain_without_tasks_returns_immediately() {
        let tasks = DetachedTasks::new();
        let start = Instant::now();
        tasks.wait_for_all_tasks();
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(tasks.pending(), 0);
    }

    #[test]
    fn test_drain_waits_for_slowest_task() {
        let tasks = DetachedTasks::new();
        let completed = Arc::new(AtomicUsize::new(0));

        let start = Instant::now();
        for delay in [10, 50, 100] {
            let completed = Arc::clone(&completed);
            tasks
                .add_task("sleep", move || {
                    thread::sleep(Duration::from_millis(delay));
                    completed.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }
        tasks.wait_for_all_tasks();

        assert!(start.elapsed() >= Duration::from_millis(100));
        assert_eq!(completed.load(Ordering::SeqCst), 3);
        assert_eq!(tasks.pending(), 0);
    }

    #[test]
    fn test_drain_waits_for_tasks_spawned_by_tasks() {
        let tasks = DetachedTasks::new();
        let completed = Arc::new(AtomicUsize::new(0));

        let inner_tasks = tasks.clone();
        let inner_completed = Arc::clone(&completed);
        tasks
            .add_task("outer", move || {
                thread::sleep(Duration::from_millis(20));
                let done = Arc::clone(&inner_completed);
                inner_tasks
                    .add_task("inner", move || {
                        thread::sleep(Duration::from_millis(50));
                        done.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
                inner_completed.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        tasks.wait_for_all_tasks();
        assert_eq!(completed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_drain_waits_for_submission_racing_the_drain() {
        let tasks = DetachedTasks::new();
        let completed = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = mpsc::channel();
        let (submitted_tx, submitted_rx) = mpsc::channel::<()>();

        // Keep the group busy until the late task is in, so the drain is
        // guaranteed to be blocked when the submission arrives.
        tasks
            .add_task("blocker", move || {
                started_tx.send(()).unwrap();
                let _ = submitted_rx.recv();
            })
            .unwrap();
        started_rx.recv().unwrap();

        let late_tasks = tasks.clone();
        let late_completed = Arc::clone(&completed);
        let submitter = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            late_tasks
                .add_task("late", move || {
                    thread::sleep(Duration::from_millis(80));
                    late_completed.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            submitted_tx.send(()).unwrap();
        });

        tasks.wait_for_all_tasks();
        assert_eq!(completed.load(Ordering::SeqCst), 1);
        submitter.join().unwrap();
    }

    #[test]
    fn test_panicking_task_still_completes() {
        let tasks = DetachedTasks::new();
        tasks.add_task("panics", || panic!("boom")).unwrap();
        tasks.wait_for_all_tasks();
        assert_eq!(tasks.pending(), 0);
    }

    #[test]
    fn test_pending_counts_running_tasks() {
        let tasks = DetachedTasks::new();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        tasks
            .add_task("held", move || {
                let _ = release_rx.recv();
            })
            .unwrap();

        assert_eq!(tasks.pending(), 1);
        release_tx.send(()).unwrap();
        tasks.wait_for_all_tasks();
        assert_eq!(tasks.pending(), 0);
    }
}
