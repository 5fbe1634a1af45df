pub mod action_log;
pub mod choice;
pub mod consent;
pub mod continuations;
pub mod intensity;
pub mod log_rain;
pub mod monologue;
pub mod popups;
pub mod threshold;
pub mod time;
