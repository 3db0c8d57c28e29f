//! Command implementations for TuxSync CLI

pub mod backup;
pub mod completions;
pub mod list;
pub mod restore;
pub mod version;
