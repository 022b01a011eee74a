// Application layer: drives the Tracker from the command line.

#[cfg(feature = "cli")]
pub mod commands;
pub mod shell;
