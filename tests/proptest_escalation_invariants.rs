//! Property-based invariants for the escalation core:
//!
//! 1. The alpha curve matches `clamp(count / threshold, 0, 1) * max_alpha`.
//! 2. The alpha curve is monotonic in the popup count.
//! 3. A non-positive threshold yields zero alpha and never fires.
//! 4. The one-shot monitor fires at most once, and only if the threshold is reached.
//! 5. Closing a popup while unfrozen always nets one more popup.
//! 6. Monologue reveals climb 1, 2, ..., L and end with the full script visible.

use std::cell::RefCell;
use std::rc::Rc;

use consent_cascade::simulation::intensity::intensity_alpha;
use consent_cascade::simulation::monologue::SequencerState;
use consent_cascade::simulation::threshold::ThresholdMonitor;
use consent_cascade::{Directive, ScriptLine, Session, SessionConfig};
use proptest::prelude::*;

fn script_strategy() -> impl Strategy<Value = Vec<ScriptLine>> {
    prop::collection::vec(("[a-zA-Z .,!?é]{1,12}", any::<bool>()), 1..5).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(text, emphasis)| ScriptLine { text, emphasis })
            .collect()
    })
}

proptest! {
    #[test]
    fn alpha_matches_clamped_ratio(
        count in 0usize..500,
        threshold in 1i32..200,
        max_alpha in 0.0f32..=1.0,
    ) {
        let expected = (count as f32 / threshold as f32).clamp(0.0, 1.0) * max_alpha;
        let alpha = intensity_alpha(count, threshold, max_alpha);
        prop_assert!((alpha - expected).abs() < 1e-6);
        prop_assert!(alpha >= 0.0 && alpha <= max_alpha);
    }

    #[test]
    fn alpha_is_monotonic(count in 0usize..500, threshold in 1i32..200, max_alpha in 0.0f32..=1.0) {
        prop_assert!(
            intensity_alpha(count, threshold, max_alpha)
                <= intensity_alpha(count + 1, threshold, max_alpha)
        );
    }

    #[test]
    fn non_positive_threshold_is_inert(count in 0usize..10_000, threshold in -100i32..=0) {
        prop_assert_eq!(intensity_alpha(count, threshold, 0.5), 0.0);
        let mut monitor = ThresholdMonitor::new(threshold, true);
        prop_assert!(!monitor.evaluate(count));
    }

    #[test]
    fn one_shot_monitor_fires_at_most_once(
        threshold in 1i32..60,
        counts in prop::collection::vec(0usize..120, 1..80),
    ) {
        let mut monitor = ThresholdMonitor::new(threshold, false);
        let fires = counts.iter().filter(|count| monitor.evaluate(**count)).count();
        let reached = counts.iter().any(|count| *count >= threshold as usize);
        prop_assert_eq!(fires, usize::from(reached));
    }

    #[test]
    fn unfrozen_close_nets_plus_one(initial in 1usize..20, closes in 1usize..10) {
        let config = SessionConfig {
            prompt_threshold: 1_000,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, 0).unwrap();
        let mut open = session.spawn_popups(initial);
        for _ in 0..closes {
            let before = session.popup_count();
            let victim = open.remove(0);
            open.extend(session.on_popup_closed_by_user(victim));
            prop_assert_eq!(session.popup_count(), before + 1);
        }
    }

    #[test]
    fn monologue_reveal_is_monotonic_and_complete(
        script in script_strategy(),
        char_delay in 0u64..40,
        sentence_delay in 0u64..200,
        frames in prop::collection::vec(1u64..120, 1..16),
    ) {
        let expected: String = script.iter().map(|line| line.text.as_str()).collect();
        let total = expected.chars().count();
        let config = SessionConfig {
            prompt_threshold: 1,
            char_delay_ms: char_delay,
            sentence_delay_ms: sentence_delay,
            script,
            ..SessionConfig::default()
        };
        let mut session = Session::new(config, 0).unwrap();
        let visible = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visible);
        session.subscribe(move |d: &Directive| {
            if let Directive::MonologueLineRevealed(text) = d {
                sink.borrow_mut().push(text.visible_chars);
            }
        });

        session.spawn_popups(1);
        prop_assert!(session.on_decision_accept());
        for dt in frames.iter().cycle().take(10_000) {
            session.tick(*dt);
            if session.sequencer_state() == SequencerState::Done {
                break;
            }
        }

        prop_assert_eq!(session.sequencer_state(), SequencerState::Done);
        let steps = visible.borrow().clone();
        prop_assert_eq!(steps, (1..=total).collect::<Vec<_>>());
        prop_assert_eq!(session.snapshot().monologue_text, expected);
    }
}
