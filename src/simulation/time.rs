use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Frame delta handed to the schedule for the next tick.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FrameDelta(pub u64);

/// Monotonic session timeline in milliseconds since session start.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClock {
    pub now_ms: u64,
    pub frame: u64,
}

impl SessionClock {
    pub fn advance(&mut self, dt_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(dt_ms);
        self.frame += 1;
    }
}

pub fn format_stamp(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// System: advances the clock by the pending frame delta.
pub fn advance_clock_system(mut clock: ResMut<SessionClock>, mut delta: ResMut<FrameDelta>) {
    clock.advance(delta.0);
    delta.0 = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_formats_minutes_seconds_millis() {
        assert_eq!(format_stamp(0), "00:00.000");
        assert_eq!(format_stamp(12_345), "00:12.345");
        assert_eq!(format_stamp(61_007), "01:01.007");
    }

    #[test]
    fn advance_counts_frames() {
        let mut clock = SessionClock::default();
        clock.advance(16);
        clock.advance(0);
        assert_eq!(clock.now_ms, 16);
        assert_eq!(clock.frame, 2);
    }
}
