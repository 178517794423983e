//! formkit TUI — edit a configured form in the terminal.
//!
//! Fields render as text inputs (plus a slider when bounded and stepped).
//! Changes are committed on Enter or slider movement and listed in a
//! commit log beside the form.

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
