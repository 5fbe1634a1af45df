use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptState {
    /// The threshold has not surfaced the prompt yet.
    Idle,
    Open,
    /// Declined; the prompt reopens once the re-prompt delay elapses.
    AwaitingReprompt,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineOutcome {
    pub decline_count: u32,
    pub message: String,
}

/// Which canned decline message to show for the `decline_count`-th decline.
pub fn decline_message_index(decline_count: u32) -> Option<usize> {
    match decline_count {
        0 => None,
        1 => Some(0),
        2 => Some(1),
        _ => Some(2),
    }
}

/// Accept/decline gate. Decline loops back forever; accept is permanent.
#[derive(Resource, Debug, Clone)]
pub struct ChoiceState {
    prompt: PromptState,
    decline_count: u32,
    messages: Vec<String>,
}

impl ChoiceState {
    pub fn new(messages: Vec<String>) -> Self {
        Self {
            prompt: PromptState::Idle,
            decline_count: 0,
            messages,
        }
    }

    /// Opens the prompt unless the session already went terminal.
    pub fn open_prompt(&mut self) -> bool {
        if self.prompt == PromptState::Terminal {
            return false;
        }
        self.prompt = PromptState::Open;
        true
    }

    /// Reopens the prompt after a decline. Stale re-prompts are ignored.
    pub fn reprompt(&mut self) -> bool {
        if self.prompt != PromptState::AwaitingReprompt {
            return false;
        }
        self.prompt = PromptState::Open;
        true
    }

    pub fn decline(&mut self) -> Option<DeclineOutcome> {
        if self.prompt != PromptState::Open {
            return None;
        }
        self.decline_count += 1;
        self.prompt = PromptState::AwaitingReprompt;
        let message = decline_message_index(self.decline_count)
            .and_then(|idx| self.messages.get(idx))
            .cloned()
            .unwrap_or_default();
        Some(DeclineOutcome {
            decline_count: self.decline_count,
            message,
        })
    }

    /// Moves to terminal. Valid while the prompt is open or waiting to
    /// reopen; a second accept is a no-op.
    pub fn accept(&mut self) -> bool {
        match self.prompt {
            PromptState::Open | PromptState::AwaitingReprompt => {
                self.prompt = PromptState::Terminal;
                true
            }
            PromptState::Idle | PromptState::Terminal => false,
        }
    }

    pub fn prompt(&self) -> PromptState {
        self.prompt
    }

    pub fn decline_count(&self) -> u32 {
        self.decline_count
    }

    pub fn is_terminal(&self) -> bool {
        self.prompt == PromptState::Terminal
    }
}
