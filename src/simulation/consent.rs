use std::str::FromStr;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Buttons on the consent window. Any of them starts the escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsentAction {
    ClearHistory,
    TurnOffTracking,
    OptOutOfDataCollection,
}

impl ConsentAction {
    pub const ALL: [ConsentAction; 3] = [
        ConsentAction::ClearHistory,
        ConsentAction::TurnOffTracking,
        ConsentAction::OptOutOfDataCollection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConsentAction::ClearHistory => "ClearHistory",
            ConsentAction::TurnOffTracking => "TurnOffTracking",
            ConsentAction::OptOutOfDataCollection => "OptOutOfDataCollection",
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            ConsentAction::ClearHistory => Tint::WARN,
            ConsentAction::TurnOffTracking => Tint::NEUTRAL,
            ConsentAction::OptOutOfDataCollection => Tint::CALM,
        }
    }

    pub fn click_log(self) -> String {
        format!("userClicked(\"{}\")", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl std::fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for ConsentAction {
    type Err = UnknownAction;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "clear_history" | "ClearHistory" => Ok(ConsentAction::ClearHistory),
            "turn_off_tracking" | "TurnOffTracking" => Ok(ConsentAction::TurnOffTracking),
            "opt_out" | "opt_out_of_data_collection" | "OptOutOfDataCollection" => {
                Ok(ConsentAction::OptOutOfDataCollection)
            }
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Background overlay colour, RGBA in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    pub const WARN: Tint = Tint {
        r: 0.2,
        g: 0.05,
        b: 0.08,
        a: 0.05,
    };
    pub const CALM: Tint = Tint {
        r: 0.11,
        g: 0.16,
        b: 0.28,
        a: 0.05,
    };
    pub const NEUTRAL: Tint = Tint {
        r: 0.18,
        g: 0.20,
        b: 0.24,
        a: 0.05,
    };
}

/// Latch for `BeginEscalation`.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct EscalationState {
    pub started: bool,
    pub consent_window_visible: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_case_and_display_names() {
        for action in ConsentAction::ALL {
            assert_eq!(action.name().parse::<ConsentAction>(), Ok(action));
        }
        assert_eq!(
            "opt_out".parse::<ConsentAction>(),
            Ok(ConsentAction::OptOutOfDataCollection)
        );
        assert_eq!(
            " turn_off_tracking ".parse::<ConsentAction>(),
            Ok(ConsentAction::TurnOffTracking)
        );
        assert!("delete_everything".parse::<ConsentAction>().is_err());
    }

    #[test]
    fn each_action_has_its_own_tint() {
        assert_eq!(ConsentAction::ClearHistory.tint(), Tint::WARN);
        assert_eq!(ConsentAction::TurnOffTracking.tint(), Tint::NEUTRAL);
        assert_eq!(ConsentAction::OptOutOfDataCollection.tint(), Tint::CALM);
    }
}
