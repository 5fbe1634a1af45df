use std::collections::BTreeSet;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity of one open surveillance popup. The presentation layer keeps its
/// own id -> visual map and destroys visuals when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PopupId(pub u32);

impl std::fmt::Display for PopupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Set of currently open popups. Only mutated through `spawn`, `close` and
/// `freeze_and_clear`.
#[derive(Resource, Debug, Default, Clone)]
pub struct PopupRegistry {
    open: BTreeSet<PopupId>,
    frozen: bool,
    next_id: u32,
}

impl PopupRegistry {
    /// Opens `count` new popups. Returns nothing once frozen.
    pub fn spawn(&mut self, count: usize) -> Vec<PopupId> {
        if self.frozen {
            return Vec::new();
        }
        let mut spawned = Vec::new();
        for _ in 0..count {
            self.next_id += 1;
            let id = PopupId(self.next_id);
            self.open.insert(id);
            spawned.push(id);
        }
        spawned
    }

    /// Removes `id`; closing an absent popup is a no-op and returns false.
    pub fn close(&mut self, id: PopupId) -> bool {
        self.open.remove(&id)
    }

    /// Freezes spawning and removes every popup, returning the removed ids.
    pub fn freeze_and_clear(&mut self) -> Vec<PopupId> {
        self.frozen = true;
        std::mem::take(&mut self.open).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn ids(&self) -> impl Iterator<Item = PopupId> + '_ {
        self.open.iter().copied()
    }
}
