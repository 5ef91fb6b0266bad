pub mod errors;
pub mod forms;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod uploads;

pub use startup::run_with_config;
