//! QCT: Quality Control Toolkit
//!
//! A CLI for managing quality exigences (sampling rules + checklists),
//! production orders, and operator control sessions, persisted as plain
//! JSON files in a workspace directory.

pub mod cli;
pub mod core;
pub mod entities;
pub mod store;
