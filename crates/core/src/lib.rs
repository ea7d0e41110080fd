//! `widgetdash-core` -- domain model and display rules.
//!
//! Pure types and functions with no I/O: widget records and payloads,
//! color contrast, the renderer decision table, settings, community
//! install mapping, and the export document.

pub mod color;
pub mod community;
pub mod editor;
pub mod error;
pub mod export;
pub mod render;
pub mod settings;
pub mod types;
pub mod widget;
