//! Everything that changes a session arrives here first and is applied at the
//! next tick boundary, including reload completions raised by timers.

use std::collections::VecDeque;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ids::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// x turns, y drives; both in [-1, 1].
    MoveAxis(Vec2),
    FireDown,
    FireUp,
    ReloadPressed,
    /// Relative pointer motion.
    AimDelta { dx: f32, dy: f32 },
    /// Pointer offset from the screen center, each axis in [-1, 1].
    AimPointer(Vec2),
    /// Explicit aim for fighters and turrets driven by direction input.
    AimDirection { yaw: f32, pitch: f32 },
    ExitMode,
    /// Raised by the reload timer.
    ReloadComplete { ticket: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedIntent {
    pub session: SessionId,
    pub intent: Intent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentQueue {
    pending: VecDeque<QueuedIntent>,
}

impl IntentQueue {
    pub fn push(&mut self, session: SessionId, intent: Intent) {
        self.pending.push_back(QueuedIntent { session, intent });
    }

    /// Takes everything queued so far. Intents pushed while the batch is being
    /// applied wait for the following tick.
    pub fn drain(&mut self) -> Vec<QueuedIntent> {
        self.pending.drain(..).collect()
    }

    pub fn discard_session(&mut self, session: SessionId) {
        self.pending.retain(|queued| queued.session != session);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Timer {
    due_at: Duration,
    queued: QueuedIntent,
}

/// Intents scheduled for a point on the simulation clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn schedule(&mut self, due_at: Duration, session: SessionId, intent: Intent) {
        self.timers.push(Timer {
            due_at,
            queued: QueuedIntent { session, intent },
        });
    }

    /// Moves every timer due at or before `now` into `queue`, earliest first.
    pub fn release_due(&mut self, now: Duration, queue: &mut IntentQueue) -> usize {
        let mut due: Vec<Timer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.due_at <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| timer.due_at);

        for timer in &due {
            queue.push(timer.queued.session, timer.queued.intent);
        }
        due.len()
    }

    pub fn discard_session(&mut self, session: SessionId) {
        self.timers.retain(|timer| timer.queued.session != session);
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_release_in_due_order() {
        let mut timers = TimerQueue::default();
        let mut queue = IntentQueue::default();
        timers.schedule(Duration::from_millis(300), SessionId(1), Intent::ReloadComplete { ticket: 2 });
        timers.schedule(Duration::from_millis(100), SessionId(2), Intent::ReloadComplete { ticket: 1 });
        timers.schedule(Duration::from_millis(900), SessionId(3), Intent::ReloadComplete { ticket: 3 });

        assert_eq!(timers.release_due(Duration::from_millis(500), &mut queue), 2);
        let released = queue.drain();
        assert_eq!(released[0].session, SessionId(2));
        assert_eq!(released[1].session, SessionId(1));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn discarding_a_session_only_touches_its_entries() {
        let mut timers = TimerQueue::default();
        let mut queue = IntentQueue::default();
        queue.push(SessionId(1), Intent::FireDown);
        queue.push(SessionId(2), Intent::FireDown);
        timers.schedule(Duration::ZERO, SessionId(1), Intent::ReloadComplete { ticket: 0 });
        timers.schedule(Duration::ZERO, SessionId(2), Intent::ReloadComplete { ticket: 0 });

        queue.discard_session(SessionId(1));
        timers.discard_session(SessionId(1));

        assert_eq!(queue.len(), 1);
        assert_eq!(timers.len(), 1);
        assert!(queue.drain().iter().all(|queued| queued.session == SessionId(2)));
    }
}
