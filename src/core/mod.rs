pub mod directives;
pub mod ecs;
pub mod session;
