//! Shared data model layer (structs only).
//!
//! ## Purpose
//! - Keep the persisted record and report structs in one place.
//! - Make `--json` output schema changes explicit and reviewable.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs affect `--json` outputs and `boost.json`.
//! Keep them synchronized with `docs/contracts/*`.

pub mod models;
