// Re-export core modules for use by the binary or other consumers
pub mod core;
pub mod data;
pub mod simulation;
pub mod systems;
pub mod ui;

// Expose the session wrapper and the types needed to drive it
pub use crate::core::directives::{Directive, DirectiveSink, SubscriptionId};
pub use crate::core::session::{Session, SessionError, SessionSnapshot};
pub use crate::data::session_config::{load_session_config, ConfigError, ScriptLine, SessionConfig};
pub use crate::simulation::consent::ConsentAction;
pub use crate::simulation::popups::PopupId;
