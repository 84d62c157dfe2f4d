//! TUI monitor for the TD4 emulator.
//!
//! Provides the interactive front panel:
//! - Program listing with the current PC highlighted
//! - Register, flag and port state
//! - Manual single-stepping and timed automatic execution
//! - Input-port entry, memory dump and reset commands

mod app;
mod ui;

pub use app::{run_monitor, Key, Mode, MonitorApp};
