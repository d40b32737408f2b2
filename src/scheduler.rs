//! Keyed repeating timers.
//!
//! Each key owns at most one timer. Starting a timer for a key that already
//! has one replaces it, so the old timer never fires again. A single
//! [`SchedulerDriver`] steps every due timer.

use crate::thread_manager::SteppableTask;

struct ScheduledTimer {
    task: Box<dyn SteppableTask>,
    period: std::time::Duration,
    next_due: std::time::Instant,
}

pub struct TimerScheduler<K> {
    timers: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<K, ScheduledTimer>>>,
}

impl<K> Clone for TimerScheduler<K> {
    fn clone(&self) -> Self {
        TimerScheduler {
            timers: self.timers.clone(),
        }
    }
}

impl<K> TimerScheduler<K>
where
    K: Eq + std::hash::Hash + Clone + std::fmt::Display + Send + 'static,
{
    #[must_use]
    pub fn new() -> Self {
        TimerScheduler {
            timers: std::sync::Arc::new(std::sync::Mutex::new(std::collections::HashMap::new())),
        }
    }

    /// Starts a repeating timer for `key`, first firing one `period` from now.
    ///
    /// Returns `true` if a previous timer for `key` was cancelled.
    pub fn start<T: SteppableTask>(&self, key: K, task: T, period: std::time::Duration) -> bool {
        self.start_at(key, task, period, std::time::Instant::now())
    }

    pub fn start_at<T: SteppableTask>(
        &self,
        key: K,
        task: T,
        period: std::time::Duration,
        now: std::time::Instant,
    ) -> bool {
        let timer = ScheduledTimer {
            task: Box::new(task),
            period,
            next_due: now + period,
        };
        let replaced = self.lock().insert(key.clone(), timer).is_some();
        if replaced {
            log::debug!("Scheduler: Restarted timer for {key}");
        }
        replaced
    }

    /// Returns `true` if a timer for `key` existed.
    pub fn cancel(&self, key: &K) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn cancel_all(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.lock().contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Steps every timer due at `now` and returns how many fired.
    ///
    /// A timer fires at most once per call. Timers whose task reports
    /// completion are removed.
    pub fn run_due(&self, now: std::time::Instant) -> usize {
        let mut timers = self.lock();
        let mut fired = 0;
        timers.retain(|_, timer| {
            if timer.next_due > now {
                return true;
            }
            fired += 1;
            if !timer.task.step() {
                return false;
            }
            timer.next_due += timer.period;
            if timer.next_due <= now {
                // fell behind; skip the missed ticks rather than burst
                timer.next_due = now + timer.period;
            }
            true
        });
        fired
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, std::collections::HashMap<K, ScheduledTimer>> {
        // a panicking timer task leaves the map itself intact
        self.timers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<K> Default for TimerScheduler<K>
where
    K: Eq + std::hash::Hash + Clone + std::fmt::Display + Send + 'static,
{
    fn default() -> Self {
        TimerScheduler::new()
    }
}

/// Drives a [`TimerScheduler`] from a [`crate::thread_manager::ThreadManager`] thread.
pub struct SchedulerDriver<K> {
    scheduler: TimerScheduler<K>,
}

impl<K> SchedulerDriver<K> {
    #[must_use]
    pub fn new(scheduler: TimerScheduler<K>) -> Self {
        SchedulerDriver { scheduler }
    }
}

impl<K> SteppableTask for SchedulerDriver<K>
where
    K: Eq + std::hash::Hash + Clone + std::fmt::Display + Send + 'static,
{
    fn step(&mut self) -> bool {
        self.scheduler.run_due(std::time::Instant::now());
        true
    }
}
