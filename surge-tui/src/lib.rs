//! Terminal UI for SURGE - widgets, themes, and layout
//!
//! Terminal player with a speed option bar and a hold-to-speed overlay.

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, MessageType, PlayerView};
pub use theme::{Theme, SCOPE, TAPE, VHS};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{OverlayWidget, PlayerWidget, SpeedBarWidget, StatusBarWidget};
