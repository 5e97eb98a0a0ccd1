//! Ratatui front-end: a single screen with the entry form on top and the
//! live list of saved people underneath.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
