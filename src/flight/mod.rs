//! Single-Flight Coalescing Module
//!
//! Collapses concurrent loads for the same key into one execution. The first
//! caller for a key becomes the leader and runs its closure; callers that
//! arrive while the load is in flight become followers and receive a clone of
//! the leader's result. Once the load completes the key's entry is removed,
//! so a later caller starts a fresh execution; result caching is the
//! namespace coordinator's job, not this module's.
//!
//! ## Failure Handling
//! A leader that is cancelled or panics must not wedge its followers: the
//! dropped leader wakes one follower, which promotes itself and runs its own
//! closure. The coalescer never retries on behalf of a caller.

use event_listener::Event;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, Weak};

/// One in-flight load: the result slot, the completion signal, and the count
/// of currently executing leaders (0 or 1).
struct Call<T> {
    result: OnceLock<T>,
    done: Event,
    leaders: AtomicUsize,
}

impl<T> Call<T> {
    fn new() -> Self {
        Self {
            result: OnceLock::new(),
            done: Event::new(),
            leaders: AtomicUsize::new(0),
        }
    }
}

/// Releases leadership when the leader finishes or is dropped mid-load. A
/// drop without a stored result wakes one follower so it can take over.
struct LeadGuard<T> {
    call: Arc<Call<T>>,
}

impl<T> LeadGuard<T> {
    /// Claims leadership of `call`. Only one claim can be live at a time.
    fn try_claim(call: &Arc<Call<T>>) -> Option<Self> {
        if call
            .leaders
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(Self {
                call: Arc::clone(call),
            })
        } else {
            None
        }
    }
}

impl<T> Drop for LeadGuard<T> {
    fn drop(&mut self) {
        self.call.leaders.store(0, Ordering::Release);
        if self.call.result.get().is_none() {
            self.call.done.notify(1);
        }
    }
}

/// Duplicate-suppressing executor for keyed loads.
///
/// The mapping holds weak references: if every caller for a key walks away
/// before completion, the dead entry is replaced on the next call.
pub struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Weak<Call<T>>>>,
}

impl<T: Clone> FlightGroup<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `func` for `key`, unless a load for `key` is already in flight,
    /// in which case the caller waits for that load's result instead.
    pub async fn work<F, Fut>(&self, key: &str, func: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let call = {
            let mut calls = self.calls.lock();
            match calls.get(key).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let fresh = Arc::new(Call::new());
                    calls.insert(key.to_string(), Arc::downgrade(&fresh));
                    fresh
                }
            }
        };

        match LeadGuard::try_claim(&call) {
            Some(guard) => self.lead(key, &call, func, guard).await,
            None => self.follow(key, call, func).await,
        }
    }

    async fn lead<F, Fut>(&self, key: &str, call: &Arc<Call<T>>, func: F, guard: LeadGuard<T>) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // A previous leader may have finished while this caller queued for
        // promotion; hand back its result instead of loading again.
        if let Some(value) = call.result.get() {
            return value.clone();
        }

        let value = func().await;

        if call.result.set(value.clone()).is_ok() {
            self.calls.lock().remove(key);
        }
        call.done.notify(usize::MAX);
        drop(guard);
        value
    }

    async fn follow<F, Fut>(&self, key: &str, call: Arc<Call<T>>, func: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut func = Some(func);
        loop {
            if let Some(value) = call.result.get() {
                return value.clone();
            }

            // Register before re-checking, so a completion signal sent in
            // between cannot be missed.
            let listener = call.done.listen();

            if let Some(value) = call.result.get() {
                return value.clone();
            }

            if call.leaders.load(Ordering::Acquire) == 0 {
                if let Some(guard) = LeadGuard::try_claim(&call) {
                    let func = func.take().expect("promotion happens at most once");
                    return self.lead(key, &call, func, guard).await;
                }
                // Lost the promotion race; wait on the new leader.
                continue;
            }

            listener.await;
        }
    }

    /// Number of keys with a load currently in flight.
    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.calls
            .lock()
            .values()
            .filter(|call| call.upgrade().is_some())
            .count()
    }
}

impl<T: Clone> Default for FlightGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}
