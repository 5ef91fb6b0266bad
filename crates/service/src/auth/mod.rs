//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Signup, login and the user listing live here, together with the
//! credential primitives (password hashing and bearer tokens).

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;
pub mod repo;

pub use service::AuthService;
pub use token::{Claims, TokenService};
