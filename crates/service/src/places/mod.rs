//! Places: domain types, repository seam and the ownership-checked service.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::PlaceService;
