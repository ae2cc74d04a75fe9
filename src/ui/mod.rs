mod app;
mod progress;
mod theme;
mod views;

pub use app::ShiftboxApp;
pub use theme::{setup_fonts, setup_theme};
