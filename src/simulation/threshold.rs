use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorState {
    Armed,
    Fired,
}

/// Decides when the popup count has grown enough to put the decision prompt
/// in front of the user.
///
/// In one-shot mode the monitor is a latch: it fires once and stays `Fired`.
/// With `repeat` enabled it is a level trigger that re-arms whenever the
/// count drops back below the threshold.
#[derive(Resource, Debug, Clone)]
pub struct ThresholdMonitor {
    threshold: i32,
    repeat: bool,
    state: MonitorState,
    fire_count: u32,
}

impl ThresholdMonitor {
    pub fn new(threshold: i32, repeat: bool) -> Self {
        Self {
            threshold,
            repeat,
            state: MonitorState::Armed,
            fire_count: 0,
        }
    }

    /// Returns true when this evaluation should surface the prompt.
    pub fn evaluate(&mut self, count: usize) -> bool {
        if self.threshold <= 0 {
            return false;
        }
        let reached = count >= self.threshold as usize;
        match self.state {
            MonitorState::Armed if reached => {
                self.state = MonitorState::Fired;
                self.fire_count += 1;
                true
            }
            MonitorState::Fired if !reached && self.repeat => {
                self.state = MonitorState::Armed;
                false
            }
            _ => false,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn fire_count(&self) -> u32 {
        self.fire_count
    }
}
