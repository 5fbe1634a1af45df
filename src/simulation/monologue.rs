use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::session_config::ScriptLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerState {
    Idle,
    Running,
    Done,
}

/// What the reveal loop should do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextReveal {
    /// Next character of the same line after `char_delay_ms`.
    Char(u64),
    /// Line finished; the next line starts after `sentence_delay_ms`.
    Line(u64),
    Finished,
}

/// One character made visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedText {
    pub line_index: usize,
    /// Characters visible across the whole monologue.
    pub visible_chars: usize,
    /// Visible part of the current line.
    pub line_text: String,
    /// Visible part of the whole monologue.
    pub full_text: String,
    pub emphasis: bool,
}

#[derive(Debug, Clone)]
pub struct RevealStep {
    pub revealed: RevealedText,
    pub next: NextReveal,
}

/// Plays the fixed script one character at a time.
///
/// Each line is appended to the buffer when it starts; characters are then
/// revealed from the previous cumulative count up to the new one. Emphasis
/// changes styling only, never pacing. The sequencer moves Idle -> Running
/// -> Done exactly once. `halt` stops further reveals and keeps whatever
/// text was visible.
#[derive(Resource, Debug, Clone)]
pub struct MonologueSequencer {
    script: Vec<ScriptLine>,
    char_delay_ms: u64,
    sentence_delay_ms: u64,
    state: SequencerState,
    live: bool,
    buffer: String,
    line: usize,
    line_start_byte: usize,
    visible_bytes: usize,
    visible_chars: usize,
}

impl MonologueSequencer {
    pub fn new(script: Vec<ScriptLine>, char_delay_ms: u64, sentence_delay_ms: u64) -> Self {
        Self {
            script,
            char_delay_ms,
            sentence_delay_ms,
            state: SequencerState::Idle,
            live: true,
            buffer: String::new(),
            line: 0,
            line_start_byte: 0,
            visible_bytes: 0,
            visible_chars: 0,
        }
    }

    /// Starts playback. Returns false when already started or halted.
    pub fn start(&mut self) -> bool {
        if self.state != SequencerState::Idle || !self.live {
            return false;
        }
        let Some(first) = self.script.first() else {
            self.state = SequencerState::Done;
            return false;
        };
        self.buffer.push_str(&first.text);
        self.state = SequencerState::Running;
        true
    }

    /// Reveals exactly one more character. `None` once halted or not running.
    pub fn step(&mut self) -> Option<RevealStep> {
        if !self.live || self.state != SequencerState::Running {
            return None;
        }

        if self.visible_bytes == self.buffer.len() {
            // Current line is fully visible; open the next one.
            let next_line = self.script.get(self.line + 1)?;
            self.line += 1;
            self.line_start_byte = self.buffer.len();
            self.buffer.push_str(&next_line.text);
        }

        let ch = self.buffer[self.visible_bytes..].chars().next()?;
        self.visible_bytes += ch.len_utf8();
        self.visible_chars += 1;

        let line_done = self.visible_bytes == self.buffer.len();
        let next = if !line_done {
            NextReveal::Char(self.char_delay_ms)
        } else if self.line + 1 < self.script.len() {
            NextReveal::Line(self.sentence_delay_ms)
        } else {
            self.state = SequencerState::Done;
            NextReveal::Finished
        };

        Some(RevealStep {
            revealed: RevealedText {
                line_index: self.line,
                visible_chars: self.visible_chars,
                line_text: self.buffer[self.line_start_byte..self.visible_bytes].to_string(),
                full_text: self.visible_text().to_string(),
                emphasis: self.script[self.line].emphasis,
            },
            next,
        })
    }

    /// Cancels playback mid-reveal without touching visible text.
    pub fn halt(&mut self) {
        self.live = false;
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn visible_text(&self) -> &str {
        &self.buffer[..self.visible_bytes]
    }

    pub fn visible_chars(&self) -> usize {
        self.visible_chars
    }
}
