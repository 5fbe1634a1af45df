use std::collections::VecDeque;

use bevy_ecs::prelude::*;

use crate::simulation::time::format_stamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "[INFO]",
            LogLevel::Warn => "[WARN]",
        }
    }
}

/// In-fiction console shown to the user, e.g.
/// `00:12.345 [INFO] userClicked("ClearHistory");`
#[derive(Resource, Debug, Clone)]
pub struct ActionLog {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl ActionLog {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    /// Appends a formatted line and returns it; empty messages are skipped.
    pub fn push(&mut self, at_ms: u64, level: LogLevel, message: &str) -> Option<String> {
        if message.is_empty() {
            return None;
        }
        let line = format_line(at_ms, level, message);
        self.lines.push_back(line.clone());
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
        Some(line)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whole panel text, one line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

pub fn format_line(at_ms: u64, level: LogLevel, message: &str) -> String {
    format!(
        "{} {} {};",
        format_stamp(at_ms),
        level.tag(),
        escape_markup(message)
    )
}

fn escape_markup(message: &str) -> String {
    message.replace('<', "&lt;").replace('>', "&gt;")
}
