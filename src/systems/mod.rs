pub mod choice;
pub mod continuations;
pub mod escalation;

use bevy_ecs::prelude::*;

use crate::core::directives::{Directive, DirectiveLog};
use crate::simulation::action_log::{ActionLog, LogLevel};
use crate::simulation::time::SessionClock;

/// Writes a line to the in-fiction action log and mirrors it to the outbox.
pub fn record_action(world: &mut World, level: LogLevel, message: &str) {
    let now = world.resource::<SessionClock>().now_ms;
    let line = world.resource_mut::<ActionLog>().push(now, level, message);
    if let Some(line) = line {
        world
            .resource_mut::<DirectiveLog>()
            .push(Directive::ActionLogLine { line });
    }
}

/// Queues a directive for the presentation layer.
pub fn emit(world: &mut World, directive: Directive) {
    world.resource_mut::<DirectiveLog>().push(directive);
}
