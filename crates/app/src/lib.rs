//! `widgetdash` library crate.
//!
//! Configuration, application state, and the command-line front end. The
//! binary entrypoint lives in `main.rs`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod theme;
pub mod view;
