use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::core::directives::DirectiveLog;
use crate::data::session_config::SessionConfig;
use crate::simulation::action_log::ActionLog;
use crate::simulation::choice::ChoiceState;
use crate::simulation::consent::EscalationState;
use crate::simulation::continuations::ContinuationQueue;
use crate::simulation::intensity::IntensityState;
use crate::simulation::log_rain::LogRain;
use crate::simulation::monologue::MonologueSequencer;
use crate::simulation::popups::PopupRegistry;
use crate::simulation::threshold::ThresholdMonitor;
use crate::simulation::time::{advance_clock_system, FrameDelta, SessionClock};
use crate::systems::continuations::run_continuations_system;

/// Canonical tick ordering for a session.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TickSet {
    Intake,
    Simulation,
}

/// Build the ECS world for one session from a validated config.
pub fn create_world(config: SessionConfig, seed: u64) -> World {
    let mut world = World::new();
    world.insert_resource(SessionClock::default());
    world.insert_resource(FrameDelta::default());
    world.insert_resource(ContinuationQueue::default());
    world.insert_resource(DirectiveLog::default());
    world.insert_resource(EscalationState::default());
    world.insert_resource(PopupRegistry::default());
    world.insert_resource(IntensityState::default());
    world.insert_resource(ThresholdMonitor::new(
        config.prompt_threshold,
        config.repeat_prompts,
    ));
    world.insert_resource(ChoiceState::new(config.decline_messages.clone()));
    world.insert_resource(MonologueSequencer::new(
        config.script.clone(),
        config.char_delay_ms,
        config.sentence_delay_ms,
    ));
    world.insert_resource(ActionLog::new(config.action_log_lines));
    world.insert_resource(LogRain::new(seed));
    world.insert_resource(config);
    world
}

/// Build the tick schedule: clock first, then due continuations.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets((TickSet::Intake, TickSet::Simulation).chain());

    schedule.add_systems((
        advance_clock_system.in_set(TickSet::Intake),
        run_continuations_system.in_set(TickSet::Simulation),
    ));

    schedule
}
