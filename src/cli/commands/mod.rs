//! CLI command implementations

pub mod control;
pub mod exg;
pub mod init;
pub mod log;
pub mod ord;
