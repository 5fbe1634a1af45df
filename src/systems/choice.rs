use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info};

use crate::core::directives::Directive;
use crate::data::session_config::SessionConfig;
use crate::simulation::action_log::LogLevel;
use crate::simulation::choice::{ChoiceState, DeclineOutcome, PromptState};
use crate::simulation::continuations::{Continuation, ContinuationQueue};
use crate::simulation::monologue::MonologueSequencer;
use crate::simulation::time::SessionClock;
use crate::systems::escalation::freeze_and_clear;
use crate::systems::{emit, record_action};

/// Puts the decision prompt on screen. A pending re-prompt becomes redundant.
pub fn surface_prompt(world: &mut World) {
    if !world.resource_mut::<ChoiceState>().open_prompt() {
        return;
    }
    world
        .resource_mut::<ContinuationQueue>()
        .cancel(Continuation::Reprompt);
    emit(world, Directive::PromptRequested);
}

/// Decline: pick the message, hide the prompt, bring it back after a delay.
pub fn decline(world: &mut World) -> Option<DeclineOutcome> {
    let Some(outcome) = world.resource_mut::<ChoiceState>().decline() else {
        debug!("decline ignored, prompt not open");
        return None;
    };

    emit(
        world,
        Directive::DeclineMessage {
            decline_count: outcome.decline_count,
            text: outcome.message.clone(),
        },
    );
    emit(world, Directive::PromptDismissed);

    let now = world.resource::<SessionClock>().now_ms;
    let delay = world.resource::<SessionConfig>().reprompt_delay_ms;
    world
        .resource_mut::<ContinuationQueue>()
        .schedule(now.saturating_add(delay), Continuation::Reprompt);

    record_action(
        world,
        LogLevel::Warn,
        &format!("userDeclined({})", outcome.decline_count),
    );
    Some(outcome)
}

/// Re-prompt continuation; stale when accept already ran.
pub fn reprompt(world: &mut World) {
    if world.resource_mut::<ChoiceState>().reprompt() {
        emit(world, Directive::PromptRequested);
    }
}

/// Accept: freeze and clear popups, hide the prompt, go terminal and start
/// the monologue. Preempts any pending re-prompt. Second calls are no-ops.
pub fn accept(world: &mut World) -> bool {
    let previous = world.resource::<ChoiceState>().prompt();
    if !world.resource_mut::<ChoiceState>().accept() {
        debug!(?previous, "accept ignored");
        return false;
    }

    world
        .resource_mut::<ContinuationQueue>()
        .cancel(Continuation::Reprompt);
    freeze_and_clear(world);
    if previous == PromptState::Open {
        emit(world, Directive::PromptDismissed);
    }
    emit(world, Directive::SessionTerminal);
    info!("session entered terminal mode");
    record_action(world, LogLevel::Info, "userAccepted()");

    start_monologue(world);
    true
}

pub fn start_monologue(world: &mut World) -> bool {
    if !world.resource_mut::<MonologueSequencer>().start() {
        return false;
    }
    let now = world.resource::<SessionClock>().now_ms;
    let chars = world.resource::<SessionConfig>().script_len();
    debug!(chars, "monologue started");
    world
        .resource_mut::<ContinuationQueue>()
        .schedule(now, Continuation::RevealMonologue);
    true
}
