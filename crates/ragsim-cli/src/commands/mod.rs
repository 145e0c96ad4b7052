//! CLI command implementations.

pub mod common;
pub mod detect;
pub mod run;
pub mod scenarios;
pub mod shell;
pub mod show;
