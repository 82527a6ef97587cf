//! GUI module for the dashboard
//!
//! Two views over one record set: the filterable bug table and the
//! flow/resolution analytics. Network I/O happens on the fetch worker
//! thread (see [`crate::fetch`]); the UI thread only sends commands and
//! drains updates.

pub mod analytics_view;
pub mod app;
pub mod bugs_view;
pub mod link_dialog;
pub mod runner;
pub mod theme;

pub use app::{DeckApp, ViewMode};
pub use link_dialog::LinkDialog;
pub use runner::run_gui;
