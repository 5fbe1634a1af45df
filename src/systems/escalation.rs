use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info};

use crate::core::directives::Directive;
use crate::data::session_config::SessionConfig;
use crate::simulation::action_log::LogLevel;
use crate::simulation::consent::{ConsentAction, EscalationState};
use crate::simulation::continuations::{Continuation, ContinuationQueue};
use crate::simulation::intensity::IntensityState;
use crate::simulation::log_rain::LogRain;
use crate::simulation::popups::{PopupId, PopupRegistry};
use crate::simulation::threshold::ThresholdMonitor;
use crate::simulation::time::SessionClock;
use crate::systems::choice::surface_prompt;
use crate::systems::{emit, record_action};

/// Handles one consent-window button: tint, log rain, hide the window, then
/// start the escalation.
pub fn apply_consent_action(world: &mut World, action: ConsentAction) {
    emit(world, Directive::BackgroundTint { tint: action.tint() });

    let (logs_per_click, glitch) = {
        let config = world.resource::<SessionConfig>();
        (config.logs_per_click, config.glitch_text)
    };
    let base = format!("log: {}", action.click_log());
    let lines = world
        .resource_mut::<LogRain>()
        .burst(&base, logs_per_click, glitch);
    if !lines.is_empty() {
        emit(world, Directive::LogRain { lines });
    }
    record_action(world, LogLevel::Info, &action.click_log());

    world
        .resource_mut::<ContinuationQueue>()
        .cancel(Continuation::ShowConsentWindow);
    world.resource_mut::<EscalationState>().consent_window_visible = false;
    emit(world, Directive::ConsentWindowHidden);

    begin_escalation(world);
}

/// Enables spawning. Latched: only the first call schedules the initial popups.
pub fn begin_escalation(world: &mut World) -> bool {
    if world.resource::<EscalationState>().started {
        debug!("begin_escalation called again, ignoring");
        record_action(
            world,
            LogLevel::Info,
            "[Surveillance] BeginSurveillance called again, ignoring.",
        );
        return false;
    }
    world.resource_mut::<EscalationState>().started = true;

    let now = world.resource::<SessionClock>().now_ms;
    let delay = world.resource::<SessionConfig>().initial_spawn_delay_ms;
    world
        .resource_mut::<ContinuationQueue>()
        .schedule(now.saturating_add(delay), Continuation::SpawnInitialPopups);
    info!(at_ms = now, "escalation started");
    record_action(
        world,
        LogLevel::Info,
        "[Surveillance] BeginSurveillance called. Starting surveillance...",
    );
    true
}

/// Opens `count` popups unless the registry is frozen.
pub fn spawn_popups(world: &mut World, count: usize) -> Vec<PopupId> {
    let spawned = world.resource_mut::<PopupRegistry>().spawn(count);
    if spawned.is_empty() {
        if count > 0 {
            debug!(count, "spawn ignored, registry frozen");
        }
        return spawned;
    }

    for id in &spawned {
        emit(world, Directive::PopupOpened { id: *id });
    }
    record_action(
        world,
        LogLevel::Info,
        &format!("[Surveillance] Spawned {} camera popup(s).", spawned.len()),
    );
    after_registry_change(world);
    spawned
}

/// Closes one popup; absent ids are ignored.
pub fn close_popup(world: &mut World, id: PopupId) -> bool {
    if !world.resource_mut::<PopupRegistry>().close(id) {
        debug!(popup = id.0, "close ignored, popup not open");
        return false;
    }
    emit(world, Directive::PopupClosed { id });
    after_registry_change(world);
    true
}

/// User clicked a popup's close button: it closes, and unless the session
/// has frozen the registry, more popups take its place.
pub fn close_popup_by_user(world: &mut World, id: PopupId) -> Vec<PopupId> {
    if !close_popup(world, id) {
        return Vec::new();
    }
    if world.resource::<PopupRegistry>().is_frozen() {
        return Vec::new();
    }
    let respawn = world.resource::<SessionConfig>().respawn_on_close;
    record_action(
        world,
        LogLevel::Info,
        &format!("[Surveillance] Popup closed. Spawning {} new popups.", respawn),
    );
    spawn_popups(world, respawn)
}

/// Freezes spawning and removes every popup in one step.
pub fn freeze_and_clear(world: &mut World) -> Vec<PopupId> {
    let cleared = world.resource_mut::<PopupRegistry>().freeze_and_clear();
    emit(
        world,
        Directive::PopupsCleared {
            ids: cleared.clone(),
        },
    );
    after_registry_change(world);
    cleared
}

/// Intensity recompute followed by the threshold check. Runs after every
/// registry mutation, before control returns to the caller.
pub fn after_registry_change(world: &mut World) {
    let count = world.resource::<PopupRegistry>().len();
    let (threshold, max_alpha) = {
        let config = world.resource::<SessionConfig>();
        (config.prompt_threshold, config.max_alpha)
    };

    let alpha = {
        let mut intensity = world.resource_mut::<IntensityState>();
        intensity.recompute(count, threshold, max_alpha);
        intensity.alpha
    };
    emit(world, Directive::IntensityChanged { alpha });

    if world.resource_mut::<ThresholdMonitor>().evaluate(count) {
        info!(count, threshold, "popup threshold reached");
        record_action(
            world,
            LogLevel::Warn,
            &format!("[Surveillance] {} watchers active. Requesting consent.", count),
        );
        surface_prompt(world);
    }
}
