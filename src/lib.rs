pub mod config;
pub mod error;
pub mod http;
pub mod services;
pub mod workflow;

pub use error::{GenericError, NavMapError};
