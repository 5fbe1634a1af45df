use bevy_ecs::prelude::*;

/// Work resumed on the session timeline once its due time has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuation {
    ShowConsentWindow,
    SpawnInitialPopups,
    Reprompt,
    RevealMonologue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub due_ms: u64,
    pub seq: u64,
    pub continuation: Continuation,
}

/// Pending continuations plus the liveness flag checked before each resume.
#[derive(Resource, Debug, Clone)]
pub struct ContinuationQueue {
    pending: Vec<Scheduled>,
    next_seq: u64,
    live: bool,
}

impl Default for ContinuationQueue {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
            live: true,
        }
    }
}

impl ContinuationQueue {
    pub fn schedule(&mut self, due_ms: u64, continuation: Continuation) -> bool {
        if !self.live {
            return false;
        }
        self.pending.push(Scheduled {
            due_ms,
            seq: self.next_seq,
            continuation,
        });
        self.next_seq += 1;
        true
    }

    /// Earliest entry due at or before `now_ms`; ties run in insertion order.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Scheduled> {
        if !self.live {
            return None;
        }
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due_ms <= now_ms)
            .min_by_key(|(_, entry)| (entry.due_ms, entry.seq))
            .map(|(idx, _)| idx)?;
        Some(self.pending.swap_remove(idx))
    }

    /// Drops pending entries of one kind, returning how many were removed.
    pub fn cancel(&mut self, continuation: Continuation) -> usize {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.continuation != continuation);
        before - self.pending.len()
    }

    pub fn is_pending(&self, continuation: Continuation) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.continuation == continuation)
    }

    pub fn shutdown(&mut self) {
        self.live = false;
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
