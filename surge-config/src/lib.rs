//! Configuration for SURGE - gesture timings, multipliers and speed options

mod config;
mod speed_menu;

pub use config::Config;
pub use speed_menu::{
    format_speed, MenuError, SpeedMenu, CUSTOM_SPEED_STEP, DEFAULT_VISIBLE, MAX_CUSTOM_SPEED,
    MIN_CUSTOM_SPEED, PRESET_SPEEDS,
};
