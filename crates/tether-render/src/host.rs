#![forbid(unsafe_code)]

//! Single-threaded event host: viewport resize notifications and one-shot timers.
//!
//! # Design
//!
//! [`EventHost`] stands in for the environment's event loop. It owns a virtual clock, the
//! current viewport, a list of resize subscribers and a queue of pending timers, all behind one
//! `Rc<RefCell<..>>`. Handles are cheap clones of the same host.
//!
//! Callbacks are stored as `Weak` references; the strong `Rc` lives in the RAII guard returned
//! to the caller ([`ResizeSubscription`], [`TimerGuard`]). Dropping a guard removes its entry
//! from the host immediately, so a torn-down owner can never be called back and the host's
//! counters always reflect live registrations.
//!
//! # Failure Modes
//!
//! - **Re-entrant dispatch**: callbacks run outside the host borrow, so they may subscribe,
//!   schedule or drop guards. Calling `resize()`/`advance()` from inside a callback dispatches
//!   nested events immediately.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

type ResizeCallback = dyn Fn(Viewport);
type TimerCallback = dyn Fn();

struct ResizeEntry {
    id: u64,
    callback: Weak<ResizeCallback>,
}

struct TimerEntry {
    id: u64,
    deadline: Duration,
    callback: Weak<TimerCallback>,
}

struct HostInner {
    now: Duration,
    viewport: Viewport,
    next_id: u64,
    resize_subscribers: Vec<ResizeEntry>,
    timers: Vec<TimerEntry>,
}

impl HostInner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared handle to the event host. Cloning shares the same clock, viewport and registrations.
#[derive(Clone)]
pub struct EventHost {
    inner: Rc<RefCell<HostInner>>,
}

impl std::fmt::Debug for EventHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventHost")
            .field("now", &inner.now)
            .field("viewport", &inner.viewport)
            .field("resize_subscribers", &inner.resize_subscribers.len())
            .field("timers", &inner.timers.len())
            .finish()
    }
}

impl EventHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HostInner {
                now: Duration::ZERO,
                viewport,
                next_id: 0,
                resize_subscribers: Vec::new(),
                timers: Vec::new(),
            })),
        }
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Registers `callback` for every future resize. Dropping the returned guard unregisters it.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe_resize(&self, callback: impl Fn(Viewport) + 'static) -> ResizeSubscription {
        let strong: Rc<ResizeCallback> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        inner.resize_subscribers.push(ResizeEntry {
            id,
            callback: Rc::downgrade(&strong),
        });
        ResizeSubscription {
            id,
            host: Rc::downgrade(&self.inner),
            _callback: strong,
        }
    }

    /// Schedules `callback` to run once, `delay` after the current virtual time. Dropping the
    /// returned guard before the deadline cancels it.
    #[must_use = "dropping the guard cancels the timer"]
    pub fn set_timeout(&self, delay: Duration, callback: impl Fn() + 'static) -> TimerGuard {
        let strong: Rc<TimerCallback> = Rc::new(callback);
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id();
        let deadline = inner.now + delay;
        inner.timers.push(TimerEntry {
            id,
            deadline,
            callback: Rc::downgrade(&strong),
        });
        TimerGuard {
            id,
            host: Rc::downgrade(&self.inner),
            _callback: strong,
        }
    }

    /// Sets the viewport and notifies live subscribers in registration order.
    pub fn resize(&self, viewport: Viewport) {
        let callbacks: Vec<Rc<ResizeCallback>> = {
            let mut inner = self.inner.borrow_mut();
            inner.viewport = viewport;
            inner
                .resize_subscribers
                .retain(|s| s.callback.strong_count() > 0);
            inner
                .resize_subscribers
                .iter()
                .filter_map(|s| s.callback.upgrade())
                .collect()
        };
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            subscribers = callbacks.len(),
            "viewport resized"
        );
        for cb in &callbacks {
            cb(viewport);
        }
    }

    /// Moves the clock forward by `by`, firing every timer that falls due, earliest deadline
    /// first (ties in scheduling order).
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        while let Some(cb) = self.pop_due(target) {
            cb();
        }
        // A callback may have advanced the clock past `target` already.
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(target);
    }

    fn pop_due(&self, target: Duration) -> Option<Rc<TimerCallback>> {
        let mut inner = self.inner.borrow_mut();
        loop {
            let idx = inner
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.deadline <= target)
                .min_by_key(|(_, t)| (t.deadline, t.id))
                .map(|(i, _)| i)?;
            let entry = inner.timers.remove(idx);
            if let Some(cb) = entry.callback.upgrade() {
                inner.now = inner.now.max(entry.deadline);
                return Some(cb);
            }
        }
    }

    pub fn resize_listener_count(&self) -> usize {
        self.inner
            .borrow()
            .resize_subscribers
            .iter()
            .filter(|s| s.callback.strong_count() > 0)
            .count()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }
}

/// RAII guard for a resize callback.
pub struct ResizeSubscription {
    id: u64,
    host: Weak<RefCell<HostInner>>,
    _callback: Rc<ResizeCallback>,
}

impl std::fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            // A guard dropped from inside a dispatch still finds the host unborrowed: dispatch
            // releases its borrow before calling out.
            if let Ok(mut inner) = host.try_borrow_mut() {
                inner.resize_subscribers.retain(|s| s.id != self.id);
            }
        }
    }
}

/// RAII guard for a one-shot timer. Dropping it cancels the timer if it has not fired yet.
pub struct TimerGuard {
    id: u64,
    host: Weak<RefCell<HostInner>>,
    _callback: Rc<TimerCallback>,
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(host) = self.host.upgrade() {
            if let Ok(mut inner) = host.try_borrow_mut() {
                inner.timers.retain(|t| t.id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let c = Rc::new(Cell::new(0));
        (Rc::clone(&c), c)
    }

    #[test]
    fn resize_notifies_subscribers_in_order() {
        let host = EventHost::new(Viewport::new(1100.0, 700.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let l2 = Rc::clone(&log);
        let _a = host.subscribe_resize(move |vp| l1.borrow_mut().push(("a", vp.width)));
        let _b = host.subscribe_resize(move |vp| l2.borrow_mut().push(("b", vp.width)));

        host.resize(Viewport::new(800.0, 900.0));
        assert_eq!(*log.borrow(), vec![("a", 800.0), ("b", 800.0)]);
        assert_eq!(host.viewport(), Viewport::new(800.0, 900.0));
    }

    #[test]
    fn dropped_subscription_is_not_called() {
        let host = EventHost::new(Viewport::new(10.0, 10.0));
        let (seen, count) = counter();
        let sub = host.subscribe_resize(move |_| seen.set(seen.get() + 1));
        assert_eq!(host.resize_listener_count(), 1);

        host.resize(Viewport::new(20.0, 20.0));
        drop(sub);
        assert_eq!(host.resize_listener_count(), 0);
        host.resize(Viewport::new(30.0, 30.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn timers_fire_once_in_deadline_order() {
        let host = EventHost::new(Viewport::new(10.0, 10.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2) = (Rc::clone(&log), Rc::clone(&log));
        let h1 = host.clone();
        let h2 = host.clone();
        let _late = host.set_timeout(Duration::from_millis(150), move || {
            l1.borrow_mut().push(("late", h1.now()))
        });
        let _early = host.set_timeout(Duration::from_millis(100), move || {
            l2.borrow_mut().push(("early", h2.now()))
        });
        assert_eq!(host.pending_timer_count(), 2);

        host.advance(Duration::from_millis(99));
        assert!(log.borrow().is_empty());

        host.advance(Duration::from_millis(200));
        assert_eq!(
            *log.borrow(),
            vec![
                ("early", Duration::from_millis(100)),
                ("late", Duration::from_millis(150)),
            ]
        );
        assert_eq!(host.now(), Duration::from_millis(299));
        assert_eq!(host.pending_timer_count(), 0);

        host.advance(Duration::from_secs(10));
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn dropping_timer_guard_cancels() {
        let host = EventHost::new(Viewport::new(10.0, 10.0));
        let (seen, count) = counter();
        let guard = host.set_timeout(Duration::from_millis(100), move || seen.set(seen.get() + 1));
        drop(guard);
        assert_eq!(host.pending_timer_count(), 0);
        host.advance(Duration::from_millis(500));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn callbacks_may_schedule_more_work() {
        let host = EventHost::new(Viewport::new(10.0, 10.0));
        let (seen, count) = counter();
        let slot: Rc<RefCell<Option<TimerGuard>>> = Rc::new(RefCell::new(None));
        let (h, s) = (host.clone(), Rc::clone(&slot));
        let _first = host.set_timeout(Duration::from_millis(10), move || {
            let seen = Rc::clone(&seen);
            let next = h.set_timeout(Duration::from_millis(10), move || seen.set(seen.get() + 1));
            *s.borrow_mut() = Some(next);
        });

        host.advance(Duration::from_millis(25));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn nested_advance_never_moves_clock_backwards() {
        let host = EventHost::new(Viewport::new(10.0, 10.0));
        let h = host.clone();
        let _tick = host.set_timeout(Duration::from_millis(10), move || {
            h.advance(Duration::from_millis(1000));
        });

        host.advance(Duration::from_millis(20));
        assert_eq!(host.now(), Duration::from_millis(1010));

        // Deadlines scheduled afterwards are relative to the advanced clock.
        let (seen, count) = counter();
        let _next = host.set_timeout(Duration::from_millis(5), move || seen.set(seen.get() + 1));
        host.advance(Duration::from_millis(4));
        assert_eq!(count.get(), 0);
        host.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
    }
}
