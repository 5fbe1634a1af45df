//! End-to-end session flows driven through the public `Session` API.

use std::cell::RefCell;
use std::rc::Rc;

use consent_cascade::simulation::choice::PromptState;
use consent_cascade::simulation::monologue::SequencerState;
use consent_cascade::simulation::threshold::MonitorState;
use consent_cascade::{
    load_session_config, ConsentAction, Directive, ScriptLine, Session, SessionConfig,
};

type Recorded = Rc<RefCell<Vec<Directive>>>;

fn record(session: &mut Session) -> Recorded {
    let seen: Recorded = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.subscribe(move |d: &Directive| sink.borrow_mut().push(d.clone()));
    seen
}

fn take(seen: &Recorded) -> Vec<Directive> {
    std::mem::take(&mut *seen.borrow_mut())
}

fn count(directives: &[Directive], pred: impl Fn(&Directive) -> bool) -> usize {
    directives.iter().filter(|d| pred(d)).count()
}

fn scenario_config() -> SessionConfig {
    SessionConfig {
        prompt_threshold: 3,
        max_alpha: 0.5,
        reprompt_delay_ms: 500,
        char_delay_ms: 20,
        sentence_delay_ms: 200,
        decline_messages: vec!["msg1".into(), "msg2".into(), "msg3".into()],
        script: vec![
            ScriptLine::plain("We see you. "),
            ScriptLine::emphasized("Always."),
            ScriptLine::plain(" Goodbye."),
        ],
        ..SessionConfig::default()
    }
}

#[test]
fn full_escalation_to_monologue() {
    let mut session = Session::new(scenario_config(), 11).unwrap();
    let seen = record(&mut session);

    session.spawn_popups(1);
    assert!((session.alpha() - 0.5 / 3.0).abs() < 1e-4);
    assert_eq!(session.prompt(), PromptState::Idle);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 0);

    session.spawn_popups(2);
    assert_eq!(session.popup_count(), 3);
    assert_eq!(session.alpha(), 0.5);
    assert_eq!(session.prompt(), PromptState::Open);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 1);

    assert_eq!(session.on_decision_decline().as_deref(), Some("msg1"));
    assert_eq!(session.prompt(), PromptState::AwaitingReprompt);
    let after_decline = take(&seen);
    assert!(after_decline.contains(&Directive::DeclineMessage {
        decline_count: 1,
        text: "msg1".into()
    }));
    assert!(after_decline.contains(&Directive::PromptDismissed));

    session.tick(499);
    assert_eq!(session.prompt(), PromptState::AwaitingReprompt);
    session.tick(1);
    assert_eq!(session.prompt(), PromptState::Open);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 1);

    assert_eq!(session.on_decision_decline().as_deref(), Some("msg2"));
    session.tick(500);
    assert!(session.on_decision_accept());

    let snapshot = session.snapshot();
    assert!(snapshot.frozen);
    assert!(snapshot.open_popups.is_empty());
    assert_eq!(snapshot.alpha, 0.0);
    assert_eq!(snapshot.prompt, PromptState::Terminal);
    assert_eq!(snapshot.sequencer, SequencerState::Running);
    take(&seen);

    for _ in 0..1_000 {
        session.tick(16);
        if session.sequencer_state() == SequencerState::Done {
            break;
        }
    }
    assert_eq!(session.sequencer_state(), SequencerState::Done);
    assert_eq!(
        session.snapshot().monologue_text,
        "We see you. Always. Goodbye."
    );

    let directives = take(&seen);
    let mut line_order: Vec<usize> = Vec::new();
    for directive in &directives {
        if let Directive::MonologueLineRevealed(text) = directive {
            if line_order.last() != Some(&text.line_index) {
                line_order.push(text.line_index);
            }
            assert_eq!(text.emphasis, text.line_index == 1);
        }
    }
    assert_eq!(line_order, [0, 1, 2]);
    assert_eq!(count(&directives, |d| *d == Directive::MonologueFinished), 1);
}

#[test]
fn registry_change_emits_intensity_before_prompt() {
    let mut session = Session::new(scenario_config(), 0).unwrap();
    let seen = record(&mut session);
    session.spawn_popups(3);

    let directives = take(&seen);
    let opened = directives
        .iter()
        .position(|d| matches!(d, Directive::PopupOpened { .. }))
        .unwrap();
    let intensity = directives
        .iter()
        .position(|d| matches!(d, Directive::IntensityChanged { .. }))
        .unwrap();
    let prompt = directives
        .iter()
        .position(|d| *d == Directive::PromptRequested)
        .unwrap();
    assert!(opened < intensity && intensity < prompt);
}

#[test]
fn accept_twice_terminates_once() {
    let mut session = Session::new(scenario_config(), 0).unwrap();
    let seen = record(&mut session);
    session.spawn_popups(3);
    assert!(session.on_decision_accept());
    assert!(!session.on_decision_accept());
    session.tick(10_000);
    assert!(!session.on_decision_accept());

    let directives = take(&seen);
    assert_eq!(count(&directives, |d| *d == Directive::SessionTerminal), 1);
    assert_eq!(count(&directives, |d| *d == Directive::MonologueFinished), 1);
}

#[test]
fn accept_preempts_pending_reprompt() {
    let mut session = Session::new(scenario_config(), 0).unwrap();
    let seen = record(&mut session);
    session.spawn_popups(3);
    session.on_decision_decline();
    assert!(session.on_decision_accept());
    take(&seen);

    session.tick(5_000);
    assert_eq!(session.prompt(), PromptState::Terminal);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 0);
}

#[test]
fn closing_popups_is_a_losing_battle() {
    let mut session = Session::new(scenario_config(), 0).unwrap();
    let first = session.spawn_popups(1)[0];

    let replacements = session.on_popup_closed_by_user(first);
    assert_eq!(replacements.len(), 2);
    assert_eq!(session.popup_count(), 2);

    // Already closed: nothing happens.
    assert!(session.on_popup_closed_by_user(first).is_empty());
    assert_eq!(session.popup_count(), 2);
    assert_eq!(session.snapshot().threshold, MonitorState::Armed);

    let next = replacements[0];
    session.on_popup_closed_by_user(next);
    assert_eq!(session.popup_count(), 3);
    assert_eq!(session.prompt(), PromptState::Open);

    session.on_decision_accept();
    let leftover = session.spawn_popups(4);
    assert!(leftover.is_empty());
    assert_eq!(session.popup_count(), 0);
}

#[test]
fn consent_click_starts_escalation_once() {
    let config = SessionConfig {
        logs_per_click: 25,
        initial_popups: 3,
        initial_spawn_delay_ms: 100,
        ..scenario_config()
    };
    let mut session = Session::new(config, 5).unwrap();
    let seen = record(&mut session);

    session.on_user_action("clear_history").unwrap();
    let directives = take(&seen);
    assert!(matches!(
        directives.first(),
        Some(Directive::BackgroundTint { tint }) if *tint == ConsentAction::ClearHistory.tint()
    ));
    let rain = directives
        .iter()
        .find_map(|d| match d {
            Directive::LogRain { lines } => Some(lines.len()),
            _ => None,
        })
        .unwrap();
    assert_eq!(rain, 25);
    assert!(directives.contains(&Directive::ConsentWindowHidden));
    assert!(session.snapshot().escalation_started);
    assert_eq!(session.popup_count(), 0);

    session.tick(100);
    assert_eq!(session.popup_count(), 3);

    session.on_user_action("opt_out").unwrap();
    session.tick(100);
    assert_eq!(session.popup_count(), 3);

    // The consent window was dismissed before it ever appeared.
    session.tick(5_000);
    assert_eq!(
        count(&take(&seen), |d| *d == Directive::ConsentWindowShown),
        0
    );
    assert!(session
        .action_log()
        .lines()
        .any(|line| line.ends_with("[INFO] userClicked(\"ClearHistory\");")));
}

#[test]
fn disposing_mid_monologue_keeps_partial_text() {
    let mut session = Session::new(scenario_config(), 0).unwrap();
    let seen = record(&mut session);
    session.spawn_popups(3);
    session.on_decision_accept();
    session.tick(0);
    session.tick(20);
    session.tick(20);

    let partial = session.snapshot().monologue_text;
    assert_eq!(partial, "We ");
    session.dispose();
    take(&seen);

    session.tick(60_000);
    let snapshot = session.snapshot();
    assert!(!snapshot.alive);
    assert_eq!(snapshot.monologue_text, partial);
    assert_eq!(snapshot.sequencer, SequencerState::Running);
    assert!(take(&seen).is_empty());
}

#[test]
fn repeat_mode_refire_replaces_pending_reprompt() {
    let config = SessionConfig {
        repeat_prompts: true,
        respawn_on_close: 0,
        ..scenario_config()
    };
    let mut session = Session::new(config, 0).unwrap();
    let seen = record(&mut session);

    let ids = session.spawn_popups(3);
    assert_eq!(session.on_decision_decline().as_deref(), Some("msg1"));
    assert_eq!(session.prompt(), PromptState::AwaitingReprompt);

    // Dropping below the threshold re-arms the monitor.
    assert!(session.on_popup_closed_by_user(ids[0]).is_empty());
    assert_eq!(session.snapshot().threshold, MonitorState::Armed);
    take(&seen);

    session.spawn_popups(1);
    assert_eq!(session.prompt(), PromptState::Open);
    assert_eq!(session.snapshot().prompt_fires, 2);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 1);

    // The re-prompt scheduled by the decline no longer fires.
    session.tick(5_000);
    assert_eq!(session.prompt(), PromptState::Open);
    assert_eq!(count(&take(&seen), |d| *d == Directive::PromptRequested), 0);
    assert_eq!(session.on_decision_decline().as_deref(), Some("msg2"));
}

#[test]
fn enormous_delays_never_come_due() {
    let config = SessionConfig {
        reprompt_delay_ms: u64::MAX,
        char_delay_ms: u64::MAX,
        sentence_delay_ms: u64::MAX,
        initial_spawn_delay_ms: u64::MAX,
        ..scenario_config()
    };
    let mut session = Session::new(config, 0).unwrap();
    session.tick(1);
    session.on_user_action("turn_off_tracking").unwrap();
    session.tick(5);
    assert_eq!(session.popup_count(), 0);

    session.spawn_popups(3);
    assert_eq!(session.on_decision_decline().as_deref(), Some("msg1"));
    session.tick(1);
    assert_eq!(session.prompt(), PromptState::AwaitingReprompt);

    assert!(session.on_decision_accept());
    session.tick(1);
    session.tick(1_000);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.monologue_text, "W");
    assert_eq!(snapshot.sequencer, SequencerState::Running);
}

#[test]
fn bundled_config_is_valid() {
    let config = load_session_config("./assets/data/session.json").unwrap();
    assert_eq!(config.decline_messages.len(), 3);
    assert!(config.script.iter().any(|line| line.emphasis));
    assert!(Session::new(config, 0).is_ok());
}
