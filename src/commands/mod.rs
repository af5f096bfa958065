//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `script.rs`: `script prune|add|check` and the `uninstall` hook.
//! - `install.rs`: `sync`, `stale`, `targets`.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod install;
pub mod script;

pub use install::handle_install_commands;
pub use script::{handle_script_commands, handle_uninstall};
