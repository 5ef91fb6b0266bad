//! Service layer: credential handling and ownership-checked place mutations
//! on top of `models`.
//! - Repository traits separate business rules from data access.
//! - Two backends: PostgreSQL through sea-orm and an in-process store.
//! - Errors are typed per workflow (`AuthError`, `ServiceError`).

pub mod errors;
pub mod auth;
pub mod places;
pub mod storage;
#[cfg(test)]
pub mod test_support;
