use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info};

use crate::core::directives::Directive;
use crate::data::session_config::SessionConfig;
use crate::simulation::action_log::LogLevel;
use crate::simulation::consent::EscalationState;
use crate::simulation::continuations::{Continuation, ContinuationQueue, Scheduled};
use crate::simulation::monologue::{MonologueSequencer, NextReveal};
use crate::simulation::time::SessionClock;
use crate::systems::choice::reprompt;
use crate::systems::escalation::spawn_popups;
use crate::systems::{emit, record_action};

/// System: resumes every continuation whose due time has elapsed.
pub fn run_continuations_system(world: &mut World) {
    loop {
        let now = world.resource::<SessionClock>().now_ms;
        let Some(entry) = world.resource_mut::<ContinuationQueue>().pop_due(now) else {
            break;
        };
        resume(world, entry);
    }
}

fn resume(world: &mut World, entry: Scheduled) {
    match entry.continuation {
        Continuation::ShowConsentWindow => {
            world.resource_mut::<EscalationState>().consent_window_visible = true;
            emit(world, Directive::ConsentWindowShown);
        }
        Continuation::SpawnInitialPopups => {
            let count = world.resource::<SessionConfig>().initial_popups;
            spawn_popups(world, count);
        }
        Continuation::Reprompt => reprompt(world),
        Continuation::RevealMonologue => reveal_next(world, entry.due_ms),
    }
}

/// One character per resume; the next reveal is anchored on this entry's due
/// time so pacing holds across long frames.
fn reveal_next(world: &mut World, due_ms: u64) {
    let Some(step) = world.resource_mut::<MonologueSequencer>().step() else {
        debug!("reveal skipped, sequencer halted or idle");
        return;
    };
    emit(world, Directive::MonologueLineRevealed(step.revealed));

    match step.next {
        NextReveal::Char(delay) | NextReveal::Line(delay) => {
            world
                .resource_mut::<ContinuationQueue>()
                .schedule(due_ms.saturating_add(delay), Continuation::RevealMonologue);
        }
        NextReveal::Finished => {
            info!("monologue finished");
            emit(world, Directive::MonologueFinished);
            record_action(world, LogLevel::Info, "monologueComplete()");
        }
    }
}
