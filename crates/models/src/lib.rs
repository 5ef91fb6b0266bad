//! sea-orm entities for users and places plus the field validators shared by
//! every write path.

pub mod errors;
pub mod db;
pub mod user;
pub mod place;

#[cfg(test)]
mod tests;
