//! UI Widgets for SURGE

mod overlay;
mod player;
mod speed_bar;
pub mod status_bar;

pub use overlay::OverlayWidget;
pub use player::PlayerWidget;
pub use speed_bar::SpeedBarWidget;
pub use status_bar::StatusBarWidget;
