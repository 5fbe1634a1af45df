use std::io::{self, Write};

use crate::core::directives::{Directive, DirectiveSink};
use crate::core::session::SessionSnapshot;
use crate::simulation::time::format_stamp;

const BOLD_RED: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// Turns directives into terminal text. Monologue reveals are streamed one
/// character at a time on the same line.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    json: bool,
    reveal_line: Option<usize>,
    revealed_in_line: usize,
}

impl ConsoleRenderer {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            ..Self::default()
        }
    }

    pub fn render(&mut self, directive: &Directive) -> Option<String> {
        if self.json {
            return serde_json::to_string(directive)
                .ok()
                .map(|line| format!("{}\n", line));
        }

        let text = match directive {
            Directive::MonologueLineRevealed(revealed) => {
                let mut out = String::new();
                if self.reveal_line != Some(revealed.line_index) {
                    if self.reveal_line.is_some() {
                        out.push('\n');
                    }
                    self.reveal_line = Some(revealed.line_index);
                    self.revealed_in_line = 0;
                }
                let fresh: String = revealed
                    .line_text
                    .chars()
                    .skip(self.revealed_in_line)
                    .collect();
                self.revealed_in_line = revealed.line_text.chars().count();
                if revealed.emphasis {
                    out.push_str(BOLD_RED);
                    out.push_str(&fresh);
                    out.push_str(RESET);
                } else {
                    out.push_str(&fresh);
                }
                return Some(out);
            }
            Directive::MonologueFinished => {
                self.reveal_line = None;
                "\n[monologue finished]".to_string()
            }
            Directive::ConsentWindowShown => {
                "[window] Privacy settings: clear_history | turn_off_tracking | opt_out".to_string()
            }
            Directive::ConsentWindowHidden => "[window] closed".to_string(),
            Directive::BackgroundTint { tint } => format!(
                "[tint] rgba({:.2}, {:.2}, {:.2}, {:.2})",
                tint.r, tint.g, tint.b, tint.a
            ),
            Directive::LogRain { lines } => {
                let preview: Vec<&str> = lines.iter().take(3).map(String::as_str).collect();
                format!("[rain] {} lines: {} ...", lines.len(), preview.join(" | "))
            }
            Directive::ActionLogLine { line } => format!("[log] {}", line),
            Directive::PopupOpened { id } => format!("[popup] camera {} opened", id),
            Directive::PopupClosed { id } => format!("[popup] camera {} closed", id),
            Directive::PopupsCleared { ids } => format!("[popup] {} cameras cleared", ids.len()),
            Directive::IntensityChanged { alpha } => format!("[red] alpha {:.3}", alpha),
            Directive::PromptRequested => {
                "[prompt] Allow us to keep watching you? (accept | decline)".to_string()
            }
            Directive::PromptDismissed => "[prompt] hidden".to_string(),
            Directive::DeclineMessage {
                decline_count,
                text,
            } => format!("[decline #{}] {}", decline_count, text),
            Directive::SessionTerminal => "[session] terminal".to_string(),
        };
        Some(format!("{}\n", text))
    }
}

impl DirectiveSink for ConsoleRenderer {
    fn deliver(&mut self, directive: &Directive) {
        if let Some(text) = self.render(directive) {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }
}

pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let mut output = String::new();
    output.push_str("=== Session ===\n");
    output.push_str(&format!(
        "t={} alive={} escalation={} window={}\n",
        format_stamp(snapshot.now_ms),
        snapshot.alive,
        snapshot.escalation_started,
        snapshot.consent_window_visible
    ));
    let ids: Vec<String> = snapshot
        .open_popups
        .iter()
        .map(|id| id.0.to_string())
        .collect();
    output.push_str(&format!(
        "popups: {} open{} [{}]\n",
        snapshot.open_popups.len(),
        if snapshot.frozen { " (frozen)" } else { "" },
        ids.join(", ")
    ));
    output.push_str(&format!(
        "alpha: {:.3} threshold: {:?} (fired {}x)\n",
        snapshot.alpha, snapshot.threshold, snapshot.prompt_fires
    ));
    output.push_str(&format!(
        "prompt: {:?} declines: {}\n",
        snapshot.prompt, snapshot.decline_count
    ));
    output.push_str(&format!(
        "monologue: {:?} log: {} lines\n",
        snapshot.sequencer, snapshot.action_log_lines
    ));
    if !snapshot.monologue_text.is_empty() {
        output.push_str(&format!("> {}\n", snapshot.monologue_text));
    }
    output
}
