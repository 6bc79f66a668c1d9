//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - Orchard and weather data entry form
//! - Prediction result with traffic-light tier and CSV download

mod app;
mod theme;
mod ui;

pub use app::{App, HullRotService, Screen};
pub use theme::OrchardTheme;
