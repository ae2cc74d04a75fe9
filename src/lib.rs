//! Weekly shift and vacation editor for a single employee.
//!
//! `schedule` holds the editing model and the commit protocol, `api` talks
//! to the schedule service, `ui` is the egui front end.

pub mod api;
pub mod config;
pub mod schedule;
pub mod session;
pub mod ui;
