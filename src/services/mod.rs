//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `signature.rs`: recognizer for the injected `boost:update` command.
//! - `composer.rs`: hook pruning/injection on `composer.json` with atomic writes.
//! - `reconcile.rs`: stale artifact detection and fault-tolerant removal.
//! - `targets.rs`: agent catalogue, skill/package directories, agent bindings.
//! - `storage.rs`: install record persistence + managed-directory materialization.
//! - `settings.rs`: optional `boostkit.toml` loading.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod composer;
pub mod output;
pub mod reconcile;
pub mod settings;
pub mod signature;
pub mod storage;
pub mod targets;
