//! Presentation of a finished run: stdout table, JSON and the terminal view.

pub mod app;
pub mod table;

pub use app::{run_app, RankingApp};
pub use table::{render_json, render_table};
