use bevy_ecs::prelude::*;
use bevy_utils::tracing::{debug, info, warn};
use serde::Serialize;

use crate::core::directives::{Directive, DirectiveLog, DirectiveSink, SubscriptionId};
use crate::core::ecs::{create_schedule, create_world};
use crate::data::session_config::{ConfigError, SessionConfig};
use crate::simulation::action_log::ActionLog;
use crate::simulation::choice::{ChoiceState, PromptState};
use crate::simulation::consent::{ConsentAction, EscalationState, UnknownAction};
use crate::simulation::continuations::{Continuation, ContinuationQueue};
use crate::simulation::intensity::IntensityState;
use crate::simulation::monologue::{MonologueSequencer, SequencerState};
use crate::simulation::popups::{PopupId, PopupRegistry};
use crate::simulation::threshold::{MonitorState, ThresholdMonitor};
use crate::simulation::time::{FrameDelta, SessionClock};
use crate::systems::{choice, escalation};

#[derive(Debug)]
pub enum SessionError {
    Config(ConfigError),
    UnknownAction(UnknownAction),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Config(err) => write!(f, "{}", err),
            SessionError::UnknownAction(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Config(err) => Some(err),
            SessionError::UnknownAction(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Config(err)
    }
}

impl From<UnknownAction> for SessionError {
    fn from(err: UnknownAction) -> Self {
        SessionError::UnknownAction(err)
    }
}

/// Data snapshot returned to the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub now_ms: u64,
    pub alive: bool,
    pub escalation_started: bool,
    pub consent_window_visible: bool,
    pub open_popups: Vec<PopupId>,
    pub frozen: bool,
    pub alpha: f32,
    pub threshold: MonitorState,
    pub prompt_fires: u32,
    pub prompt: PromptState,
    pub decline_count: u32,
    pub sequencer: SequencerState,
    pub monologue_text: String,
    pub action_log_lines: usize,
}

/// One escalation session: the ECS world, its tick schedule and the
/// subscribers receiving directives.
///
/// Every external call runs to completion before returning, so registry
/// mutation, intensity recompute and the threshold check are never
/// interleaved with another call. Directives produced by a call are
/// delivered before it returns.
pub struct Session {
    world: World,
    schedule: Schedule,
    sinks: Vec<(SubscriptionId, Box<dyn DirectiveSink>)>,
    next_subscription: u64,
    alive: bool,
}

impl Session {
    /// Validate `config` and build a session. `seed` drives the log-rain glitch.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, SessionError> {
        config.validate()?;
        let window_delay = config.consent_window_delay_ms;
        let mut world = create_world(config, seed);
        world
            .resource_mut::<ContinuationQueue>()
            .schedule(window_delay, Continuation::ShowConsentWindow);
        info!(seed, "session created");

        Ok(Self {
            world,
            schedule: create_schedule(),
            sinks: Vec::new(),
            next_subscription: 1,
            alive: true,
        })
    }

    pub fn subscribe<S>(&mut self, sink: S) -> SubscriptionId
    where
        S: DirectiveSink + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        if self.alive {
            self.sinks.push((id, Box::new(sink)));
        }
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sub, _)| *sub != id);
        before != self.sinks.len()
    }

    /// Maps a UI action id onto its consent action.
    pub fn on_user_action(&mut self, action_id: &str) -> Result<(), SessionError> {
        let action: ConsentAction = action_id.parse()?;
        self.apply_action(action);
        Ok(())
    }

    pub fn apply_action(&mut self, action: ConsentAction) {
        if !self.alive {
            return;
        }
        escalation::apply_consent_action(&mut self.world, action);
        self.flush();
    }

    pub fn begin_escalation(&mut self) {
        if !self.alive {
            return;
        }
        escalation::begin_escalation(&mut self.world);
        self.flush();
    }

    pub fn spawn_popups(&mut self, count: usize) -> Vec<PopupId> {
        if !self.alive {
            return Vec::new();
        }
        let spawned = escalation::spawn_popups(&mut self.world, count);
        self.flush();
        spawned
    }

    /// Close button on a popup. Returns the replacement popups, if any.
    pub fn on_popup_closed_by_user(&mut self, id: PopupId) -> Vec<PopupId> {
        if !self.alive {
            return Vec::new();
        }
        let spawned = escalation::close_popup_by_user(&mut self.world, id);
        self.flush();
        spawned
    }

    pub fn on_decision_accept(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        let accepted = choice::accept(&mut self.world);
        self.flush();
        accepted
    }

    pub fn on_decision_decline(&mut self) -> Option<String> {
        if !self.alive {
            return None;
        }
        let outcome = choice::decline(&mut self.world);
        self.flush();
        outcome.map(|outcome| outcome.message)
    }

    /// Advance the timeline by `dt_ms` and resume due continuations.
    pub fn tick(&mut self, dt_ms: u64) {
        if !self.alive {
            return;
        }
        self.world.resource_mut::<FrameDelta>().0 = dt_ms;
        self.schedule.run(&mut self.world);
        self.flush();
    }

    /// Tear the session down: pending continuations are dropped, the
    /// monologue stops where it is, and every subscriber is detached.
    pub fn dispose(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.world.resource_mut::<ContinuationQueue>().shutdown();
        self.world.resource_mut::<MonologueSequencer>().halt();
        let dropped = self.world.resource_mut::<DirectiveLog>().drain().len();
        let subscribers = self.sinks.len();
        self.sinks.clear();
        debug!(dropped, subscribers, "session disposed");
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn now_ms(&self) -> u64 {
        self.world.resource::<SessionClock>().now_ms
    }

    pub fn alpha(&self) -> f32 {
        self.world.resource::<IntensityState>().alpha
    }

    pub fn popup_count(&self) -> usize {
        self.world.resource::<PopupRegistry>().len()
    }

    pub fn prompt(&self) -> PromptState {
        self.world.resource::<ChoiceState>().prompt()
    }

    pub fn sequencer_state(&self) -> SequencerState {
        self.world.resource::<MonologueSequencer>().state()
    }

    pub fn action_log(&self) -> &ActionLog {
        self.world.resource::<ActionLog>()
    }

    pub fn config(&self) -> &SessionConfig {
        self.world.resource::<SessionConfig>()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let registry = self.world.resource::<PopupRegistry>();
        let escalation = self.world.resource::<EscalationState>();
        let choice = self.world.resource::<ChoiceState>();
        let sequencer = self.world.resource::<MonologueSequencer>();
        let monitor = self.world.resource::<ThresholdMonitor>();

        SessionSnapshot {
            now_ms: self.now_ms(),
            alive: self.alive,
            escalation_started: escalation.started,
            consent_window_visible: escalation.consent_window_visible,
            open_popups: registry.ids().collect(),
            frozen: registry.is_frozen(),
            alpha: self.alpha(),
            threshold: monitor.state(),
            prompt_fires: monitor.fire_count(),
            prompt: choice.prompt(),
            decline_count: choice.decline_count(),
            sequencer: sequencer.state(),
            monologue_text: sequencer.visible_text().to_string(),
            action_log_lines: self.world.resource::<ActionLog>().len(),
        }
    }

    fn flush(&mut self) {
        let directives = self.world.resource_mut::<DirectiveLog>().drain();
        if directives.is_empty() {
            return;
        }
        if self.sinks.is_empty() {
            if directives
                .iter()
                .any(|d| matches!(d, Directive::MonologueLineRevealed(_)))
            {
                warn!("no subscriber attached, monologue reveal dropped");
            }
            debug!(count = directives.len(), "no subscriber, directives dropped");
            return;
        }
        for directive in &directives {
            for (_, sink) in self.sinks.iter_mut() {
                sink.deliver(directive);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}
