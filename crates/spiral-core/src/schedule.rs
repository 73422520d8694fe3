#![forbid(unsafe_code)]

//! Periodic tick sources.
//!
//! A [`Scheduler`] produces ticks at a fixed interval; the owner of the
//! controller collects them with [`Scheduler::take_ticks`] and runs one frame
//! per tick on its own thread. Frames therefore never overlap, no matter
//! where the ticks come from.
//!
//! - [`ThreadScheduler`] runs one timer thread per handle.
//! - [`ManualScheduler`] only ticks when told to (tests, benches, replays).

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// Identifies one scheduled tick stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of periodic ticks.
pub trait Scheduler {
    /// Start ticking every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Stop a tick stream. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);

    /// Ticks fired for `handle` since the last call.
    fn take_ticks(&mut self, handle: TickHandle) -> u32;
}

// ---------------------------------------------------------------------------
// Stop signal
// ---------------------------------------------------------------------------

/// Wakeable stop flag shared between a timer thread and its owner.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the flag and wake every waiter.
    pub fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }

    /// Wait for the stop flag or a timeout.
    ///
    /// Returns `true` if stopped, `false` if the full duration elapsed.
    /// Spurious wakeups resume waiting for the remaining time.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// ThreadScheduler
// ---------------------------------------------------------------------------

struct RunningTimer {
    stop: StopSignal,
    thread: Option<thread::JoinHandle<()>>,
    ticks: mpsc::Receiver<()>,
}

impl RunningTimer {
    fn shutdown(mut self) {
        self.stop.stop();
        if let Some(handle) = self.thread.take()
            && let Err(payload) = handle.join()
        {
            let msg = panic_message(payload.as_ref());
            #[cfg(feature = "tracing")]
            crate::warn!("timer thread panicked: {msg}");
            #[cfg(not(feature = "tracing"))]
            eprintln!("spiral-core: timer thread panicked: {msg}");
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

/// Timer-thread scheduler.
///
/// Each handle owns a thread that waits on a [`StopSignal`] with the tick
/// interval as timeout and posts a tick whenever the wait times out.
#[derive(Default)]
pub struct ThreadScheduler {
    next_id: u64,
    timers: HashMap<u64, RunningTimer>,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tick streams.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        let id = self.next_id;
        self.next_id += 1;

        let stop = StopSignal::new();
        let (sender, ticks) = mpsc::channel();
        let signal = stop.clone();
        let thread = thread::spawn(move || {
            let mut sent: u64 = 0;
            crate::debug_trace!("timer {} started: interval={:?}", id, interval);
            while !signal.wait_timeout(interval) {
                if sender.send(()).is_err() {
                    break;
                }
                sent += 1;
            }
            crate::debug_trace!("timer {} stopped after {} ticks", id, sent);
        });

        self.timers.insert(
            id,
            RunningTimer {
                stop,
                thread: Some(thread),
                ticks,
            },
        );
        TickHandle(id)
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(timer) = self.timers.remove(&handle.0) {
            timer.shutdown();
        }
    }

    fn take_ticks(&mut self, handle: TickHandle) -> u32 {
        self.timers
            .get(&handle.0)
            .map(|timer| timer.ticks.try_iter().count() as u32)
            .unwrap_or(0)
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.shutdown();
        }
    }
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ManualState {
    next_id: u64,
    pending: HashMap<u64, u32>,
    intervals: HashMap<u64, Duration>,
}

/// Scheduler that ticks only through [`ManualScheduler::fire`].
///
/// Clones share state, so a test can keep one clone and hand the other to a
/// controller.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add `n` ticks to every live handle.
    pub fn fire(&self, n: u32) {
        let mut state = self.lock();
        for pending in state.pending.values_mut() {
            *pending = pending.saturating_add(n);
        }
    }

    /// Number of live tick streams.
    pub fn active_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Interval requested for a live handle.
    pub fn interval(&self, handle: TickHandle) -> Option<Duration> {
        self.lock().intervals.get(&handle.0).copied()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.pending.insert(id, 0);
        state.intervals.insert(id, interval);
        TickHandle(id)
    }

    fn cancel(&mut self, handle: TickHandle) {
        let mut state = self.lock();
        state.pending.remove(&handle.0);
        state.intervals.remove(&handle.0);
    }

    fn take_ticks(&mut self, handle: TickHandle) -> u32 {
        self.lock()
            .pending
            .get_mut(&handle.0)
            .map(std::mem::take)
            .unwrap_or(0)
    }
}
