//! Storage backends for the service layer.
//!
//! The SeaORM repositories live next to their traits (`auth::repo`,
//! `places::repo`); this module holds the in-process store used by tests and
//! by `memory://` deployments.

pub mod memory;
