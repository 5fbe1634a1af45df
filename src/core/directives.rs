use bevy_ecs::prelude::*;
use serde::Serialize;

use crate::simulation::consent::Tint;
use crate::simulation::monologue::RevealedText;
use crate::simulation::popups::PopupId;

/// Display instruction emitted to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    ConsentWindowShown,
    ConsentWindowHidden,
    BackgroundTint { tint: Tint },
    LogRain { lines: Vec<String> },
    ActionLogLine { line: String },
    PopupOpened { id: PopupId },
    PopupClosed { id: PopupId },
    PopupsCleared { ids: Vec<PopupId> },
    IntensityChanged { alpha: f32 },
    PromptRequested,
    PromptDismissed,
    DeclineMessage { decline_count: u32, text: String },
    SessionTerminal,
    MonologueLineRevealed(RevealedText),
    MonologueFinished,
}

/// Outbox filled while the world mutates, flushed to subscribers afterwards.
#[derive(Resource, Default, Debug)]
pub struct DirectiveLog(pub Vec<Directive>);

impl DirectiveLog {
    pub fn push(&mut self, directive: Directive) {
        self.0.push(directive);
    }

    pub fn drain(&mut self) -> Vec<Directive> {
        std::mem::take(&mut self.0)
    }
}

/// Receiver of directives, registered with `Session::subscribe`.
pub trait DirectiveSink {
    fn deliver(&mut self, directive: &Directive);
}

impl<F> DirectiveSink for F
where
    F: FnMut(&Directive),
{
    fn deliver(&mut self, directive: &Directive) {
        self(directive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);
