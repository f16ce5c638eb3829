//! Core data model and collaborator seams
//!
//! Everything the editor components share: diagram types and the example
//! catalog, typed graphics, the display surface, the traits standing in for
//! external services, configuration, errors and logging.

pub mod catalog;
mod config;
mod error;
mod graphics;
pub mod logging;
mod services;
mod surface;
mod types;

pub use catalog::{example, example_for_id};
pub use config::*;
pub use error::*;
pub use graphics::*;
pub use logging::*;
pub use services::*;
pub use surface::*;
pub use types::*;
