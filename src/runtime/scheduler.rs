use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::Millis;

/// Handle to a scheduled timeout or frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

/// Handle to a host-signal subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Host signals a component may subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostSignal {
    Scroll,
    Resize,
    MotionPreference,
    Visibility,
}

/// Call counts for every schedule/cancel/subscribe/unsubscribe operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchedulerLedger {
    pub timeouts_set: u64,
    pub timeouts_cleared: u64,
    pub timeouts_fired: u64,
    pub frames_requested: u64,
    pub frames_cancelled: u64,
    pub frames_fired: u64,
    pub subscribed: u64,
    pub unsubscribed: u64,
}

/// Live handle counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LiveCounts {
    pub timeouts: usize,
    pub frames: usize,
    pub listeners: usize,
}

impl LiveCounts {
    pub fn total(self) -> usize {
        self.timeouts + self.frames + self.listeners
    }
}

/// Deterministic single-threaded stand-in for a host event loop.
///
/// Nothing here runs callbacks: owners keep the ids they scheduled and the host routes fired
/// ids back to them. Time only moves through [`Scheduler::pop_due`] and
/// [`Scheduler::advance_to`].
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_id: u64,
    timeouts: BTreeMap<TaskId, Millis>,
    frames: BTreeSet<TaskId>,
    listeners: BTreeMap<ListenerId, HostSignal>,
    ledger: SchedulerLedger,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    fn next_raw(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn set_timeout(&mut self, delay_ms: u64) -> TaskId {
        let id = TaskId(self.next_raw());
        self.timeouts.insert(id, self.now.after(delay_ms));
        self.ledger.timeouts_set += 1;
        id
    }

    /// Returns `false` when the timeout already fired or was cleared.
    pub fn clear_timeout(&mut self, id: TaskId) -> bool {
        let removed = self.timeouts.remove(&id).is_some();
        if removed {
            self.ledger.timeouts_cleared += 1;
        }
        removed
    }

    pub fn request_frame(&mut self) -> TaskId {
        let id = TaskId(self.next_raw());
        self.frames.insert(id);
        self.ledger.frames_requested += 1;
        id
    }

    pub fn cancel_frame(&mut self, id: TaskId) -> bool {
        let removed = self.frames.remove(&id);
        if removed {
            self.ledger.frames_cancelled += 1;
        }
        removed
    }

    pub fn subscribe(&mut self, signal: HostSignal) -> ListenerId {
        let id = ListenerId(self.next_raw());
        self.listeners.insert(id, signal);
        self.ledger.subscribed += 1;
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let removed = self.listeners.remove(&id).is_some();
        if removed {
            self.ledger.unsubscribed += 1;
        }
        removed
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Fire the earliest timeout due at or before `limit`, moving the clock to its due time.
    pub fn pop_due(&mut self, limit: Millis) -> Option<TaskId> {
        let (&id, &due) = self
            .timeouts
            .iter()
            .filter(|(_, due)| **due <= limit)
            .min_by_key(|(id, due)| (**due, **id))?;
        self.timeouts.remove(&id);
        self.now = self.now.max(due);
        self.ledger.timeouts_fired += 1;
        Some(id)
    }

    /// Move the clock forward; never backward.
    pub fn advance_to(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Fire every pending frame request, in request order.
    pub fn take_frames(&mut self) -> Vec<TaskId> {
        let fired: Vec<TaskId> = std::mem::take(&mut self.frames).into_iter().collect();
        self.ledger.frames_fired += fired.len() as u64;
        fired
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn ledger(&self) -> SchedulerLedger {
        self.ledger
    }

    pub fn live(&self) -> LiveCounts {
        LiveCounts {
            timeouts: self.timeouts.len(),
            frames: self.frames.len(),
            listeners: self.listeners.len(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
