//! CLI library components for csv-buddy.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
