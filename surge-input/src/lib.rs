//! Input handling for SURGE
//!
//! Translates terminal key events into gesture events for the speed
//! controller, and runs the vim-style modal handler for everything else.

mod commands;
mod modal;
mod translate;

pub use commands::{parse_command_line, Command, StepDirection};
pub use modal::{InputHandler, Mode};
pub use translate::{gesture_key, translate_key, KeyPhase};
